//! Markdown report generation
//!
//! This module renders a human-readable markdown report of a crawl: run
//! overview, per-depth breakdown, the extracted fields of every scraped page,
//! and the failures.

use crate::crawler::{CrawlRequest, CrawlResult};
use crate::output::summary::summarize;
use crate::output::OutputResult;
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest extracted value rendered verbatim in the report
const MAX_VALUE_CHARS: usize = 200;

/// Writes a markdown report of a crawl to `output_path`
pub fn generate_markdown_report(
    request: &CrawlRequest,
    result: &CrawlResult,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(request, result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl as markdown
pub fn format_markdown_report(request: &CrawlRequest, result: &CrawlResult) -> String {
    let summary = summarize(result);
    let mut md = String::new();

    md.push_str("# Sumi-Harvest Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Seed URL**: {}\n", request.seed_url));
    md.push_str(&format!("- **Max Depth**: {}\n", request.max_depth));
    md.push_str(&format!("- **Max Pages**: {}\n", request.max_pages));
    md.push_str(&format!(
        "- **Execution Time**: {:.2} seconds\n\n",
        result.execution_time.as_secs_f64()
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", summary.pages_visited));
    md.push_str(&format!("- **Pages Scraped**: {}\n", summary.pages_scraped));
    md.push_str(&format!("- **Pages Failed**: {}\n", summary.pages_failed));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    if !summary.pages_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &summary.pages_by_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !result.data.is_empty() {
        md.push_str("## Scraped Pages\n\n");
        for page in &result.data {
            md.push_str(&format!("### {} (depth {})\n\n", page.url, page.depth));
            for (field, values) in &page.extracted {
                md.push_str(&format!("- **{}** ({} values)\n", field, values.len()));
                for value in values.iter().filter(|v| !v.is_empty()) {
                    md.push_str(&format!("  - {}\n", shorten(value)));
                }
            }
            md.push('\n');
        }
    }

    if !result.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Depth | Error |\n");
        md.push_str("|-----|-------|-------|\n");
        for failure in &result.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.url,
                failure.depth,
                failure.error.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}

/// Collapses whitespace and truncates long values
fn shorten(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_VALUE_CHARS {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(MAX_VALUE_CHARS).collect();
        format!("{}…", truncated)
    }
}
