//! Per-page and whole-crawl result types

use crate::{PageError, PageErrorKind};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Outcome of one attempted page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    /// The URL that was fetched
    pub url: String,

    /// Link hops from the seed URL
    pub depth: u32,

    /// Field name → trimmed text of every matched element, in document order
    pub extracted: BTreeMap<String, Vec<String>>,

    /// Set when the page could not be fetched or parsed
    #[serde(skip)]
    pub fetch_error: Option<PageError>,
}

impl PageResult {
    /// Creates a successful page result
    pub fn scraped(
        url: impl Into<String>,
        depth: u32,
        extracted: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            url: url.into(),
            depth,
            extracted,
            fetch_error: None,
        }
    }

    /// Creates a failed page result with nothing extracted
    pub fn failed(url: impl Into<String>, depth: u32, error: PageError) -> Self {
        Self {
            url: url.into(),
            depth,
            extracted: BTreeMap::new(),
            fetch_error: Some(error),
        }
    }

    /// Returns true if the page was fetched and parsed
    pub fn is_success(&self) -> bool {
        self.fetch_error.is_none()
    }
}

/// A page that was dequeued but could not be scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub depth: u32,
    pub kind: PageErrorKind,
    pub error: String,
}

impl FailedPage {
    pub fn new(url: impl Into<String>, depth: u32, error: &PageError) -> Self {
        Self {
            url: url.into(),
            depth,
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Aggregated result of one crawl
///
/// Serializes as:
///
/// ```json
/// { "success": true, "pages_scraped": 2, "execution_time": 0.42,
///   "urls_visited": ["..."], "data": [{ "url": "...", "depth": 0, "extracted": {} }] }
/// ```
///
/// A `failures` array is appended when at least one page failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResult {
    /// Always true once a crawl has run; per-page failures do not change it
    pub success: bool,

    /// Number of pages fetched and parsed successfully; equals `data.len()`
    pub pages_scraped: u32,

    /// Wall-clock time spent in the crawl loop
    #[serde(serialize_with = "serialize_secs")]
    pub execution_time: Duration,

    /// Every dequeued URL, in dequeue order, whether it succeeded or not
    pub urls_visited: Vec<String>,

    /// Successfully scraped pages, in dequeue order
    pub data: Vec<PageResult>,

    /// Pages that were dequeued but failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedPage>,
}

impl CrawlResult {
    /// Number of dequeued pages that failed
    pub fn pages_failed(&self) -> usize {
        self.failures.len()
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
