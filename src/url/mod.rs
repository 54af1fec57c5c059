//! URL handling module for Sumi-Harvest
//!
//! This module provides seed URL validation and resolution of discovered
//! `href` values into absolute URLs.

mod resolve;
mod validate;

use serde::Deserialize;

// Re-export main functions
pub use resolve::resolve_link;
pub use validate::validate_seed_url;

/// How relative `href` values are turned into absolute URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkResolution {
    /// Prefix the page's `scheme://authority` onto the href
    ///
    /// Root-relative hrefs (`/path`) are appended directly and every other
    /// relative href is appended after a `/`. The page's own directory and any
    /// `..` segments are not taken into account.
    #[default]
    Simple,

    /// RFC 3986 resolution against the full page URL
    ///
    /// Fragments are stripped, and fragment-only, `javascript:`, `mailto:`,
    /// `tel:` and `data:` hrefs are dropped along with any non-HTTP(S) target.
    Standard,
}

impl LinkResolution {
    /// Returns the configuration name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Standard => "standard",
        }
    }
}
