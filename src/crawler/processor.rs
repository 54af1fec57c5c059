//! Page processor: fetch, parse, extract, and discover links for one URL
//!
//! The processor holds only immutable settings. It never touches the frontier
//! or the crawl accumulators; it returns a value and the driver folds it in.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{parse_page, SelectorSet};
use crate::crawler::result::PageResult;
use crate::url::LinkResolution;
use crate::PageError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result of processing one page
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    /// The page outcome as reported to the caller
    pub result: PageResult,

    /// Outbound links, absolute, in document order; empty on failure
    pub links: Vec<String>,
}

impl ProcessedPage {
    fn failed(url: &str, depth: u32, error: PageError) -> Self {
        Self {
            result: PageResult::failed(url, depth, error),
            links: Vec::new(),
        }
    }
}

/// Stateless per-page worker
#[derive(Debug, Clone)]
pub struct PageProcessor {
    client: Client,
    selectors: Arc<SelectorSet>,
    timeout: Duration,
    link_resolution: LinkResolution,
}

impl PageProcessor {
    /// Creates a processor
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client
    /// * `selectors` - Compiled field selectors applied to every page
    /// * `timeout` - Per-request timeout
    /// * `link_resolution` - How relative hrefs are made absolute
    pub fn new(
        client: Client,
        selectors: SelectorSet,
        timeout: Duration,
        link_resolution: LinkResolution,
    ) -> Self {
        Self {
            client,
            selectors: Arc::new(selectors),
            timeout,
            link_resolution,
        }
    }

    /// Processes a single URL with one fetch attempt
    ///
    /// Never fails: transport errors, non-2xx responses, timeouts, and body
    /// decode failures are returned on the page result.
    pub async fn process(&self, url: &str, depth: u32) -> ProcessedPage {
        let page_url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => return ProcessedPage::failed(url, depth, PageError::InvalidUrl(e.to_string())),
        };

        tracing::debug!("Fetching {} (depth {})", url, depth);

        let body = match fetch_page(&self.client, page_url.clone(), self.timeout).await {
            Ok(body) => body,
            Err(error) => return ProcessedPage::failed(url, depth, error),
        };

        let parsed = parse_page(&body, &page_url, &self.selectors, self.link_resolution);

        tracing::debug!(
            "Parsed {}: {} fields, {} links",
            url,
            parsed.extracted.len(),
            parsed.links.len()
        );

        ProcessedPage {
            result: PageResult::scraped(url, depth, parsed.extracted),
            links: parsed.links,
        }
    }
}
