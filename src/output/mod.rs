//! Output module for crawl results and reports
//!
//! This module handles:
//! - Writing crawl results and task outcomes as JSON
//! - Generating markdown reports of a crawl
//! - Summarising crawl statistics on the console

mod json;
mod markdown;
mod summary;

pub use json::{to_json_string, write_json};
pub use markdown::{format_markdown_report, generate_markdown_report};
pub use summary::{print_summary, summarize, CrawlSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
