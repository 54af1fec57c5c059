use crate::crawler::CrawlResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Category of a failed task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskErrorType {
    /// The parameters were rejected before any work started
    ValidationError,
    /// The intent is known but handled outside this crate
    UnsupportedTask,
    /// The intent is not recognised
    UnknownIntent,
    /// The task started but could not run to completion
    ExecutionError,
}

/// What a task produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub success: bool,
    pub task_type: String,
    pub timestamp: DateTime<Utc>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<TaskErrorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CrawlResult>,
}

impl TaskOutcome {
    /// A completed crawl
    pub fn completed(task_type: impl Into<String>, result: CrawlResult) -> Self {
        Self {
            success: true,
            task_type: task_type.into(),
            timestamp: Utc::now(),
            errors: Vec::new(),
            error_type: None,
            result: Some(result),
        }
    }

    /// A task that did not produce a result
    pub fn failed(
        task_type: impl Into<String>,
        error_type: TaskErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            task_type: task_type.into(),
            timestamp: Utc::now(),
            errors: vec![message.into()],
            error_type: Some(error_type),
            result: None,
        }
    }
}
