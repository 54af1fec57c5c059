//! Crawl statistics derived from a crawl result
//!
//! This module provides a compact summary of a finished crawl and prints it
//! in a human-readable form.

use crate::crawler::CrawlResult;
use crate::PageErrorKind;
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    /// Number of URLs dequeued (successful or not)
    pub pages_visited: usize,

    /// Number of pages scraped successfully
    pub pages_scraped: usize,

    /// Number of pages that failed
    pub pages_failed: usize,

    /// Scraped pages per depth
    pub pages_by_depth: BTreeMap<u32, usize>,

    /// Failed pages per failure kind
    pub failures_by_kind: BTreeMap<PageErrorKind, usize>,

    /// Extracted values per field, across all scraped pages
    pub values_by_field: BTreeMap<String, usize>,

    /// Time spent crawling
    pub execution_time: Duration,
}

impl CrawlSummary {
    /// Percentage of visited pages that were scraped successfully
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            0.0
        } else {
            (self.pages_scraped as f64 / self.pages_visited as f64) * 100.0
        }
    }
}

/// Builds a summary from a crawl result
pub fn summarize(result: &CrawlResult) -> CrawlSummary {
    let mut summary = CrawlSummary {
        pages_visited: result.urls_visited.len(),
        pages_scraped: result.data.len(),
        pages_failed: result.failures.len(),
        execution_time: result.execution_time,
        ..CrawlSummary::default()
    };

    for page in &result.data {
        *summary.pages_by_depth.entry(page.depth).or_default() += 1;

        for (field, values) in &page.extracted {
            *summary.values_by_field.entry(field.clone()).or_default() += values.len();
        }
    }

    for failure in &result.failures {
        *summary.failures_by_kind.entry(failure.kind).or_default() += 1;
    }

    summary
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", summary.pages_visited);
    println!("  Pages scraped: {}", summary.pages_scraped);
    println!("  Pages failed: {}", summary.pages_failed);
    println!(
        "  Execution time: {:.2}s",
        summary.execution_time.as_secs_f64()
    );
    println!();

    if !summary.pages_by_depth.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &summary.pages_by_depth {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if !summary.values_by_field.is_empty() {
        println!("Extracted Values:");
        for (field, count) in &summary.values_by_field {
            println!("  {}: {}", field, count);
        }
        println!();
    }

    if !summary.failures_by_kind.is_empty() {
        println!("Failure Summary:");
        for (kind, count) in &summary.failures_by_kind {
            println!("  {:?}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully scraped)",
        summary.success_rate(),
        summary.pages_scraped,
        summary.pages_visited
    );
}
