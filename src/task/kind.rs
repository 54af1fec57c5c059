use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A task descriptor as produced by the task parser
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ParsedTask {
    /// What the task asks for, e.g. `web_scrape`
    #[serde(default)]
    pub intent: String,

    /// Intent-specific parameters
    #[serde(default)]
    pub parameters: Value,
}

impl ParsedTask {
    pub fn new(intent: impl Into<String>, parameters: Value) -> Self {
        Self {
            intent: intent.into(),
            parameters,
        }
    }
}

/// The closed set of task kinds
///
/// Only [`TaskKind::WebScrape`] is handled by this crate. The analysis and
/// image kinds are recognised so they can be reported as unsupported rather
/// than unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    WebScrape(Value),
    DataAnalysis(Value),
    ImageProcessing(Value),
    Unknown(String),
}

impl TaskKind {
    /// Classifies a parsed task by its intent (case-insensitive)
    pub fn from_parsed(task: ParsedTask) -> Self {
        match task.intent.trim().to_lowercase().as_str() {
            "web_scrape" => Self::WebScrape(task.parameters),
            "data_analysis" => Self::DataAnalysis(task.parameters),
            "image_processing" => Self::ImageProcessing(task.parameters),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The canonical intent name of this kind
    pub fn name(&self) -> &str {
        match self {
            Self::WebScrape(_) => "web_scrape",
            Self::DataAnalysis(_) => "data_analysis",
            Self::ImageProcessing(_) => "image_processing",
            Self::Unknown(intent) => intent,
        }
    }
}
