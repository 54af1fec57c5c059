use super::LinkResolution;
use url::{Position, Url};

/// Resolves a discovered `href` into an absolute URL string
///
/// Returns `None` only in [`LinkResolution::Standard`] mode, for hrefs that are
/// excluded or fail to resolve. Simple mode always produces a URL.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::{resolve_link, LinkResolution};
/// use url::Url;
///
/// let page = Url::parse("http://x.test/docs/intro").unwrap();
/// assert_eq!(
///     resolve_link("/p2", &page, LinkResolution::Simple).as_deref(),
///     Some("http://x.test/p2")
/// );
/// assert_eq!(
///     resolve_link("next", &page, LinkResolution::Standard).as_deref(),
///     Some("http://x.test/docs/next")
/// );
/// ```
pub fn resolve_link(href: &str, page_url: &Url, mode: LinkResolution) -> Option<String> {
    match mode {
        LinkResolution::Simple => Some(resolve_simple(href, page_url)),
        LinkResolution::Standard => resolve_standard(href, page_url),
    }
}

fn resolve_simple(href: &str, page_url: &Url) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    // scheme://[userinfo@]host[:port]
    let base = &page_url[..Position::BeforePath];

    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

fn resolve_standard(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute.to_string())
}
