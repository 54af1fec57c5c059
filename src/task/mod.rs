//! Task boundary for the crawl engine
//!
//! Tasks arrive as parsed descriptors (`{"intent": ..., "parameters": ...}`)
//! produced by an external task parser. This module maps them onto a closed set
//! of task kinds, runs the ones this crate can handle, and keeps a
//! process-scoped registry of every task it has seen.

mod kind;
mod outcome;
mod registry;
mod runner;

pub use kind::{ParsedTask, TaskKind};
pub use outcome::{TaskErrorType, TaskOutcome};
pub use registry::{TaskId, TaskRecord, TaskRegistry, TaskStatus};
pub use runner::{output_path_for, read_task_file, TaskRunner};

use thiserror::Error;

/// Errors raised at the task boundary
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Failed to read task file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed task descriptor: {0}")]
    Json(#[from] serde_json::Error),
}
