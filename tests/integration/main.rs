//! End-to-end tests against local mock servers

mod crawl_tests;
mod task_tests;
