//! Crawl request definition and validation
//!
//! A [`CrawlRequest`] is what the task boundary hands to the engine. It can be
//! built directly or from the loosely-typed JSON parameters of a task
//! descriptor, where missing values fall back to [`RequestDefaults`].

use crate::config::{default_selectors, Config};
use crate::crawler::parser::{compile_selectors, SelectorSet};
use crate::url::validate_seed_url;
use crate::ValidationError;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Default link depth when a task does not specify one
pub const DEFAULT_MAX_DEPTH: u32 = 1;

/// Default page budget when a task does not specify one
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// A bounded crawl to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Absolute URL the crawl starts from
    pub seed_url: String,

    /// Maximum number of link hops followed from the seed
    pub max_depth: u32,

    /// Maximum number of successfully scraped pages
    pub max_pages: u32,

    /// Field name → CSS selector
    pub selectors: BTreeMap<String, String>,
}

/// Values used for parameters a task leaves out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub max_depth: u32,
    pub max_pages: u32,
    pub selectors: BTreeMap<String, String>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            selectors: default_selectors(),
        }
    }
}

impl From<&Config> for RequestDefaults {
    fn from(config: &Config) -> Self {
        let selectors = if config.selectors.is_empty() {
            default_selectors()
        } else {
            config.selectors.clone()
        };

        Self {
            max_depth: config.crawler.max_depth,
            max_pages: config.crawler.max_pages,
            selectors,
        }
    }
}

/// A request that passed validation, ready to drive a crawl
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub seed_url: Url,
    pub max_depth: u32,
    pub max_pages: u32,
    pub selectors: SelectorSet,
}

impl CrawlRequest {
    /// Creates a request for `seed_url` with default depth, budget, and selectors
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self::with_defaults(seed_url, &RequestDefaults::default())
    }

    /// Creates a request for `seed_url` using the given defaults
    pub fn with_defaults(seed_url: impl Into<String>, defaults: &RequestDefaults) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth: defaults.max_depth,
            max_pages: defaults.max_pages,
            selectors: defaults.selectors.clone(),
        }
    }

    /// Sets the maximum link depth
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the page budget
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Replaces the selector map; an empty map restores the default one
    pub fn selectors(mut self, selectors: BTreeMap<String, String>) -> Self {
        self.selectors = if selectors.is_empty() {
            default_selectors()
        } else {
            selectors
        };
        self
    }

    /// Builds a request from task parameters
    ///
    /// Expected shape:
    ///
    /// ```json
    /// { "url": "https://example.com", "depth": 1, "max_pages": 5,
    ///   "selectors": { "title": "title", "content": "p" } }
    /// ```
    ///
    /// `url` is required. `depth` and `max_pages` accept non-negative integers
    /// or integer strings. A missing, null, or empty `selectors` object falls
    /// back to the defaults.
    pub fn from_params(params: &Value, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        let object = params
            .as_object()
            .ok_or_else(|| ValidationError::InvalidParameter {
                name: "parameters".to_string(),
                message: "expected a JSON object".to_string(),
            })?;

        let seed_url = match object.get("url") {
            Some(Value::String(url)) => url.clone(),
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingParameter("url".to_string()))
            }
            Some(other) => {
                return Err(ValidationError::InvalidParameter {
                    name: "url".to_string(),
                    message: format!("expected a string, got {}", other),
                })
            }
        };

        let max_depth = integer_param(object.get("depth"), "depth")?.unwrap_or(defaults.max_depth);
        let max_pages =
            integer_param(object.get("max_pages"), "max_pages")?.unwrap_or(defaults.max_pages);

        let selectors = match object.get("selectors") {
            None | Some(Value::Null) => defaults.selectors.clone(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(field, selector)| match selector {
                    Value::String(s) => Ok((field.clone(), s.clone())),
                    other => Err(ValidationError::InvalidParameter {
                        name: format!("selectors.{}", field),
                        message: format!("expected a string, got {}", other),
                    }),
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            Some(other) => {
                return Err(ValidationError::InvalidParameter {
                    name: "selectors".to_string(),
                    message: format!("expected an object, got {}", other),
                })
            }
        };

        Ok(Self::with_defaults(seed_url, defaults)
            .max_depth(max_depth)
            .max_pages(max_pages)
            .selectors(selectors))
    }

    /// Checks the request before any network traffic happens
    ///
    /// Rejects a malformed seed URL, a zero page budget, and selectors that do
    /// not compile.
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let seed_url =
            validate_seed_url(&self.seed_url).map_err(|reason| ValidationError::InvalidSeedUrl {
                url: self.seed_url.clone(),
                reason,
            })?;

        if self.max_pages == 0 {
            return Err(ValidationError::ZeroMaxPages);
        }

        let selectors = if self.selectors.is_empty() {
            compile_selectors(&default_selectors())?
        } else {
            compile_selectors(&self.selectors)?
        };

        Ok(ValidatedRequest {
            seed_url,
            max_depth: self.max_depth,
            max_pages: self.max_pages,
            selectors,
        })
    }
}

/// Reads an optional non-negative integer parameter
fn integer_param(value: Option<&Value>, name: &str) -> Result<Option<u32>, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidParameter {
        name: name.to_string(),
        message,
    };

    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64()) {
            (Some(value), _) => i128::from(value),
            (None, Some(value)) => i128::from(value),
            _ => return Err(invalid(format!("expected an integer, got {}", n))),
        },
        Some(Value::String(s)) => match s.trim().parse::<i128>() {
            Ok(value) => value,
            // All digits but too long even for i128
            Err(_) if is_integer_literal(s.trim()) => {
                return Err(invalid(format!("out of range, got '{}'", s)))
            }
            Err(_) => return Err(invalid(format!("expected an integer, got '{}'", s))),
        },
        Some(other) => return Err(invalid(format!("expected an integer, got {}", other))),
    };

    if parsed < 0 {
        return Err(invalid(format!(
            "must be a non-negative integer, got {}",
            parsed
        )));
    }

    u32::try_from(parsed)
        .map(Some)
        .map_err(|_| invalid(format!("out of range (max {}), got {}", u32::MAX, parsed)))
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
