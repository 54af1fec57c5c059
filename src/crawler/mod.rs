//! Crawler module for bounded breadth-first crawls
//!
//! This module contains the core crawling logic, including:
//! - The frontier queue with enqueue-time deduplication
//! - HTTP fetching with a per-request timeout
//! - HTML parsing, selector extraction, and link discovery
//! - The crawl driver that ties them together

mod driver;
mod fetcher;
mod frontier;
mod parser;
mod processor;
mod request;
mod result;

pub use driver::{CrawlDriver, CrawlPhase};
pub use fetcher::{build_http_client, fetch_page};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{compile_selectors, parse_page, ParsedPage, SelectorSet};
pub use processor::{PageProcessor, ProcessedPage};
pub use request::{
    CrawlRequest, RequestDefaults, ValidatedRequest, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
};
pub use result::{CrawlResult, FailedPage, PageResult};

use crate::config::{Config, UserAgentConfig};
use crate::url::LinkResolution;
use crate::HarvestError;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine settings that are not part of an individual request
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Per-request timeout
    pub request_timeout: Duration,

    /// Concurrent fetches within one depth level; 1 means strictly sequential
    pub concurrency: usize,

    /// How relative links are resolved
    pub link_resolution: LinkResolution,

    /// User agent identification
    pub user_agent: UserAgentConfig,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            concurrency: 1,
            link_resolution: LinkResolution::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.crawler.request_timeout_secs),
            concurrency: config.crawler.concurrency,
            link_resolution: config.crawler.link_resolution,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Runs a complete bounded crawl
///
/// This is the main entry point for the engine. It will:
/// 1. Validate the request (no network traffic if this fails)
/// 2. Build the HTTP client
/// 3. Crawl breadth-first from the seed until the frontier is empty or the
///    page budget is spent
///
/// # Returns
///
/// * `Ok(CrawlResult)` - The crawl ran; individual pages may still have failed
/// * `Err(HarvestError)` - The request was invalid or the client could not be built
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::crawler::{crawl, CrawlRequest, CrawlSettings};
///
/// # async fn example() -> Result<(), sumi_harvest::HarvestError> {
/// let request = CrawlRequest::new("https://example.com").max_depth(1).max_pages(5);
/// let result = crawl(&request, &CrawlSettings::default()).await?;
/// println!("Scraped {} pages", result.pages_scraped);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    request: &CrawlRequest,
    settings: &CrawlSettings,
) -> Result<CrawlResult, HarvestError> {
    let mut driver = CrawlDriver::new(request, settings)?;
    Ok(driver.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.crawler.request_timeout_secs = 3;
        config.crawler.concurrency = 8;
        config.crawler.link_resolution = LinkResolution::Standard;

        let settings = CrawlSettings::from(&config);
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.concurrency, 8);
        assert_eq!(settings.link_resolution, LinkResolution::Standard);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected_before_crawling() {
        let request = CrawlRequest::new("not-a-url");
        let result = crawl(&request, &CrawlSettings::default()).await;
        assert!(matches!(
            result,
            Err(HarvestError::Validation(ValidationError::InvalidSeedUrl { .. }))
        ));
    }

    #[tokio::test]
    async fn test_zero_budget_is_rejected() {
        let request = CrawlRequest::new("http://x.test/").max_pages(0);
        let result = crawl(&request, &CrawlSettings::default()).await;
        assert!(matches!(
            result,
            Err(HarvestError::Validation(ValidationError::ZeroMaxPages))
        ));
    }
}
