use crate::UrlError;
use url::Url;

/// Validates a crawl seed URL
///
/// The seed must parse as an absolute URL, use the `http` or `https` scheme,
/// and carry a non-empty host.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::validate_seed_url;
///
/// assert!(validate_seed_url("https://example.com/start").is_ok());
/// assert!(validate_seed_url("not-a-url").is_err());
/// ```
pub fn validate_seed_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}
