use crate::url::LinkResolution;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    /// Selector map used when a request does not provide its own
    #[serde(default = "default_selectors")]
    pub selectors: BTreeMap<String, String>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            selectors: default_selectors(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Link depth used when a request does not specify one
    pub max_depth: u32,

    /// Page budget used when a request does not specify one
    pub max_pages: u32,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Maximum number of concurrent fetches within one depth level
    pub concurrency: usize,

    /// How relative links are resolved
    pub link_resolution: LinkResolution,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_pages: 5,
            request_timeout_secs: 10,
            concurrency: 1,
            link_resolution: LinkResolution::Simple,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version (+ContactURL; ContactEmail)`, with the parenthesised part
    /// reduced or dropped when contact details are missing.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);

        match (self.contact_url.as_deref(), self.contact_email.as_deref()) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where to write the JSON crawl result (stdout when unset)
    pub result_path: Option<String>,

    /// Where to write the markdown crawl report
    pub summary_path: Option<String>,
}

/// The selector map used when none is configured: page title and paragraphs
pub fn default_selectors() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("title".to_string(), "title".to_string()),
        ("content".to_string(), "p".to_string()),
    ])
}
