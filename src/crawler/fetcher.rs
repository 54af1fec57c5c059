//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with a proper user agent string
//! - Single-attempt GET requests bounded by a per-request timeout
//! - Classifying failures into recoverable page errors

use crate::config::UserAgentConfig;
use crate::PageError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Timeouts are applied per request by [`fetch_page`], so one client can be
/// shared by crawls with different timeout settings.
///
/// # Example
///
/// ```no_run
/// use sumi_harvest::config::UserAgentConfig;
/// use sumi_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with a single GET request
///
/// # Failure classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Request or body read exceeds `timeout` | `PageError::Timeout` |
/// | Non-2xx status | `PageError::Status` |
/// | Body cannot be decoded | `PageError::Parse` |
/// | Anything else (DNS, refused, TLS, redirect limit) | `PageError::Transport` |
pub async fn fetch_page(client: &Client, url: Url, timeout: Duration) -> Result<String, PageError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PageError::Status(status.as_u16()));
    }

    response.text().await.map_err(|e| classify_error(e, timeout))
}

/// Maps a reqwest error onto a page error
fn classify_error(error: reqwest::Error, timeout: Duration) -> PageError {
    if error.is_timeout() {
        PageError::Timeout(timeout)
    } else if error.is_decode() {
        PageError::Parse(error.to_string())
    } else if error.is_connect() {
        PageError::Transport(format!("Connection failed: {}", error))
    } else {
        PageError::Transport(error.to_string())
    }
}
