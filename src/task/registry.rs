//! Process-scoped task registry
//!
//! Records live only as long as the process: the registry starts empty and is
//! never persisted.

use crate::task::{TaskError, TaskOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifier assigned to a task when it is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
}

/// Everything known about one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub intent: String,
    pub parameters: Value,
    pub status: TaskStatus,
    pub submitted_at: DateTime<Utc>,
    pub outcome: Option<TaskOutcome>,
}

/// Thread-safe in-memory map of task id → record
///
/// Ids are assigned sequentially starting at 1.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    last_id: AtomicU64,
    records: Mutex<HashMap<TaskId, TaskRecord>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new running task and returns its id
    pub fn register(&self, intent: impl Into<String>, parameters: Value) -> TaskId {
        let id = TaskId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = TaskRecord {
            id,
            intent: intent.into(),
            parameters,
            status: TaskStatus::Running,
            submitted_at: Utc::now(),
            outcome: None,
        };

        self.lock().insert(id, record);
        id
    }

    /// Stores the outcome of a task and marks it completed or failed
    pub fn complete(&self, id: TaskId, outcome: TaskOutcome) -> Result<(), TaskError> {
        let mut records = self.lock();
        let record = records.get_mut(&id).ok_or(TaskError::NotFound(id))?;

        record.status = if outcome.success {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        };
        record.outcome = Some(outcome);
        Ok(())
    }

    /// Returns a snapshot of a task record
    pub fn get(&self, id: TaskId) -> Result<TaskRecord, TaskError> {
        self.lock().get(&id).cloned().ok_or(TaskError::NotFound(id))
    }

    /// All registered ids, in ascending order
    pub fn ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every record; ids keep increasing afterwards
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TaskId, TaskRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
