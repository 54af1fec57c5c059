//! Task execution: parse, dispatch, record

use crate::config::Config;
use crate::crawler::{crawl, CrawlRequest, CrawlSettings, RequestDefaults};
use crate::task::{
    ParsedTask, TaskError, TaskErrorType, TaskId, TaskKind, TaskOutcome, TaskRegistry,
};
use crate::HarvestError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Executes parsed tasks and records them in a registry
#[derive(Debug, Clone)]
pub struct TaskRunner {
    settings: CrawlSettings,
    defaults: RequestDefaults,
    registry: Arc<TaskRegistry>,
}

impl TaskRunner {
    /// Creates a runner with its own empty registry
    pub fn new(settings: CrawlSettings, defaults: RequestDefaults) -> Self {
        Self::with_registry(settings, defaults, Arc::new(TaskRegistry::new()))
    }

    /// Creates a runner that records into a shared registry
    pub fn with_registry(
        settings: CrawlSettings,
        defaults: RequestDefaults,
        registry: Arc<TaskRegistry>,
    ) -> Self {
        Self {
            settings,
            defaults,
            registry,
        }
    }

    /// Creates a runner from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(CrawlSettings::from(config), RequestDefaults::from(config))
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// Registers, dispatches, and records one task
    ///
    /// Never fails: every problem is reported on the returned outcome.
    pub async fn execute(&self, task: ParsedTask) -> (TaskId, TaskOutcome) {
        let id = self
            .registry
            .register(task.intent.clone(), task.parameters.clone());
        tracing::info!("Executing task {} with intent '{}'", id, task.intent);

        let outcome = self.dispatch(TaskKind::from_parsed(task)).await;

        if let Err(e) = self.registry.complete(id, outcome.clone()) {
            tracing::warn!("Could not record outcome of task {}: {}", id, e);
        }

        if outcome.success {
            tracing::info!("Task {} completed", id);
        } else {
            tracing::warn!("Task {} failed: {}", id, outcome.errors.join("; "));
        }

        (id, outcome)
    }

    async fn dispatch(&self, kind: TaskKind) -> TaskOutcome {
        match &kind {
            TaskKind::WebScrape(params) => self.run_web_scrape(params).await,
            TaskKind::DataAnalysis(_) | TaskKind::ImageProcessing(_) => TaskOutcome::failed(
                kind.name(),
                TaskErrorType::UnsupportedTask,
                format!("{} tasks are not handled by the crawl engine", kind.name()),
            ),
            TaskKind::Unknown(intent) => TaskOutcome::failed(
                intent.as_str(),
                TaskErrorType::UnknownIntent,
                format!("Unknown task intent: '{}'", intent),
            ),
        }
    }

    async fn run_web_scrape(&self, params: &Value) -> TaskOutcome {
        const TASK_TYPE: &str = "web_scrape";

        let request = match CrawlRequest::from_params(params, &self.defaults) {
            Ok(request) => request,
            Err(e) => {
                return TaskOutcome::failed(TASK_TYPE, TaskErrorType::ValidationError, e.to_string())
            }
        };

        match crawl(&request, &self.settings).await {
            Ok(result) => TaskOutcome::completed(TASK_TYPE, result),
            Err(HarvestError::Validation(e)) => {
                TaskOutcome::failed(TASK_TYPE, TaskErrorType::ValidationError, e.to_string())
            }
            Err(e) => TaskOutcome::failed(TASK_TYPE, TaskErrorType::ExecutionError, e.to_string()),
        }
    }
}

/// Reads a parsed task descriptor from a JSON file
pub fn read_task_file(path: &Path) -> Result<ParsedTask, TaskError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Where the outcome of the task stored at `input` is written
///
/// `job_input.json` becomes `job_output.json`; any other name gets an
/// `_output.json` suffix on its stem.
pub fn output_path_for(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output_name = if file_name.contains("_input.") {
        file_name.replacen("_input.", "_output.", 1)
    } else {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "task".to_string());
        format!("{}_output.json", stem)
    };

    input.with_file_name(output_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn runner() -> TaskRunner {
        TaskRunner::new(CrawlSettings::default(), RequestDefaults::default())
    }

    #[tokio::test]
    async fn test_unknown_intent_outcome() {
        let runner = runner();
        let (id, outcome) = runner
            .execute(ParsedTask::new("launch_rocket", json!({})))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(TaskErrorType::UnknownIntent));
        assert_eq!(outcome.task_type, "launch_rocket");
        assert_eq!(runner.registry().get(id).unwrap().intent, "launch_rocket");
    }

    #[tokio::test]
    async fn test_unsupported_kind_outcome() {
        let (_, outcome) = runner()
            .execute(ParsedTask::new("image_processing", json!({ "image_url": "x" })))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(TaskErrorType::UnsupportedTask));
        assert_eq!(outcome.task_type, "image_processing");
    }

    #[tokio::test]
    async fn test_invalid_web_scrape_is_validation_error() {
        let (_, outcome) = runner()
            .execute(ParsedTask::new("web_scrape", json!({ "url": "not-a-url" })))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error_type, Some(TaskErrorType::ValidationError));
        assert!(outcome.result.is_none());
    }

    #[tokio::test]
    async fn test_zero_budget_is_validation_error() {
        let (_, outcome) = runner()
            .execute(ParsedTask::new(
                "web_scrape",
                json!({ "url": "http://x.test/", "max_pages": 0 }),
            ))
            .await;

        assert_eq!(outcome.error_type, Some(TaskErrorType::ValidationError));
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/tmp/job_input.json")),
            PathBuf::from("/tmp/job_output.json")
        );
        assert_eq!(
            output_path_for(Path::new("/tmp/scrape.json")),
            PathBuf::from("/tmp/scrape_output.json")
        );
        assert_eq!(
            output_path_for(Path::new("task")),
            PathBuf::from("task_output.json")
        );
    }

    #[test]
    fn test_read_task_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"intent": "web_scrape", "parameters": {"url": "http://x.test/"}}"#)
            .unwrap();

        let task = read_task_file(file.path()).unwrap();
        assert_eq!(task.intent, "web_scrape");
        assert_eq!(task.parameters["url"], "http://x.test/");
    }

    #[test]
    fn test_read_malformed_task_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(matches!(
            read_task_file(file.path()),
            Err(TaskError::Json(_))
        ));
    }
}
