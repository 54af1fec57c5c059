//! Sumi-Harvest: a bounded web crawl engine
//!
//! This crate crawls outward from a seed URL in breadth-first order, bounded by a
//! link-depth limit and a page budget, and extracts structured text from every
//! page it visits using CSS selector rules. Per-page failures are recorded and
//! never abort the crawl.

pub mod config;
pub mod crawler;
pub mod output;
pub mod task;
pub mod url;

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Task error: {0}")]
    Task(#[from] task::TaskError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Errors raised while validating a crawl request, before any network traffic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: UrlError },

    #[error("max_pages must be at least 1")]
    ZeroMaxPages,

    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid selector for field '{field}' ({selector}): {message}")]
    InvalidSelector {
        field: String,
        selector: String,
        message: String,
    },
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// A recoverable failure attached to a single page
///
/// These never propagate out of the crawl loop; they are recorded on the page
/// result and the crawl moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to parse response body: {0}")]
    Parse(String),
}

/// Coarse classification of a page failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorKind {
    FetchError,
    ParseError,
}

impl PageError {
    /// Returns whether this failure happened while fetching or while parsing
    pub fn kind(&self) -> PageErrorKind {
        match self {
            Self::Parse(_) => PageErrorKind::ParseError,
            _ => PageErrorKind::FetchError,
        }
    }
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlRequest, CrawlResult, CrawlSettings, PageResult};
pub use url::{resolve_link, validate_seed_url, LinkResolution};
