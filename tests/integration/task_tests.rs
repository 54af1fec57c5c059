//! Integration tests for the task runner

use serde_json::json;
use std::time::Duration;
use sumi_harvest::crawler::{CrawlSettings, RequestDefaults};
use sumi_harvest::output::write_json;
use sumi_harvest::task::{
    output_path_for, read_task_file, ParsedTask, TaskErrorType, TaskRunner, TaskStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner() -> TaskRunner {
    let settings = CrawlSettings {
        request_timeout: Duration::from_secs(5),
        ..CrawlSettings::default()
    };
    TaskRunner::new(settings, RequestDefaults::default())
}

#[tokio::test]
async fn test_web_scrape_task_completes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>Home</title></head><body><p>Hi</p></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let runner = runner();
    let task = ParsedTask::new(
        "web_scrape",
        json!({ "url": format!("{}/", server.uri()), "depth": 0 }),
    );
    let (id, outcome) = runner.execute(task).await;

    assert!(outcome.success);
    assert_eq!(outcome.task_type, "web_scrape");
    assert!(outcome.errors.is_empty());

    let result = outcome.result.as_ref().unwrap();
    assert_eq!(result.pages_scraped, 1);
    assert_eq!(result.data[0].extracted["title"], vec!["Home"]);

    let record = runner.registry().get(id).unwrap();
    assert_eq!(record.status, TaskStatus::Completed);
    assert_eq!(record.outcome, Some(outcome));
}

#[tokio::test]
async fn test_registry_tracks_every_task() {
    let runner = runner();

    let (first, _) = runner
        .execute(ParsedTask::new("summarize_everything", json!({})))
        .await;
    let (second, outcome) = runner
        .execute(ParsedTask::new("data_analysis", json!({ "data_source": "x.csv" })))
        .await;

    assert_eq!(first.as_u64(), 1);
    assert_eq!(second.as_u64(), 2);
    assert_eq!(runner.registry().len(), 2);
    assert_eq!(outcome.error_type, Some(TaskErrorType::UnsupportedTask));
    assert_eq!(
        runner.registry().get(first).unwrap().status,
        TaskStatus::Failed
    );
}

#[tokio::test]
async fn test_task_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("job_input.json");
    std::fs::write(
        &input,
        r#"{"intent": "web_scrape", "parameters": {"url": "ftp://x.test/"}}"#,
    )
    .unwrap();

    let task = read_task_file(&input).unwrap();
    let (_, outcome) = runner().execute(task).await;

    let output = output_path_for(&input);
    write_json(&outcome, Some(&output)).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("job_output.json")).unwrap())
            .unwrap();
    assert_eq!(written["success"], false);
    assert_eq!(written["error_type"], "validation_error");
    assert_eq!(written["task_type"], "web_scrape");
}
