//! HTML parser for extracting fields and links
//!
//! This module handles parsing fetched HTML to extract:
//! - Text for every configured selector field
//! - Outbound links from `<a href>` elements, resolved to absolute URLs

use crate::url::{resolve_link, LinkResolution};
use crate::ValidationError;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// A set of compiled CSS selectors keyed by field name
#[derive(Debug, Clone)]
pub struct SelectorSet {
    fields: Vec<(String, Selector)>,
}

impl SelectorSet {
    /// Field names in extraction order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the set has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compiles a field → selector map
///
/// Every expression must be valid CSS selector syntax; the first one that is
/// not is reported as a validation error.
pub fn compile_selectors(
    selectors: &BTreeMap<String, String>,
) -> Result<SelectorSet, ValidationError> {
    let fields = selectors
        .iter()
        .map(|(field, expression)| {
            Selector::parse(expression)
                .map(|selector| (field.clone(), selector))
                .map_err(|e| ValidationError::InvalidSelector {
                    field: field.clone(),
                    selector: expression.clone(),
                    message: format!("{:?}", e),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SelectorSet { fields })
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// Trimmed text of each matched element, per field, in document order
    pub extracted: BTreeMap<String, Vec<String>>,

    /// Absolute URLs of all outbound links, in document order
    pub links: Vec<String>,
}

/// Parses HTML content, applies the selectors, and discovers links
///
/// A selector that matches nothing yields an empty list for its field.
///
/// # Example
///
/// ```
/// use sumi_harvest::config::default_selectors;
/// use sumi_harvest::crawler::{compile_selectors, parse_page};
/// use sumi_harvest::url::LinkResolution;
/// use url::Url;
///
/// let html = r#"<html><head><title>Foo</title></head><body><p>a</p><p>b</p></body></html>"#;
/// let selectors = compile_selectors(&default_selectors()).unwrap();
/// let page_url = Url::parse("http://x.test/p1").unwrap();
///
/// let parsed = parse_page(html, &page_url, &selectors, LinkResolution::Simple);
/// assert_eq!(parsed.extracted["title"], vec!["Foo"]);
/// assert_eq!(parsed.extracted["content"], vec!["a", "b"]);
/// ```
pub fn parse_page(
    html: &str,
    page_url: &Url,
    selectors: &SelectorSet,
    resolution: LinkResolution,
) -> ParsedPage {
    let document = Html::parse_document(html);

    let extracted = selectors
        .fields
        .iter()
        .map(|(field, selector)| (field.clone(), extract_text(&document, selector)))
        .collect();

    let links = extract_links(&document, page_url, resolution);

    ParsedPage { extracted, links }
}

/// Collects the trimmed visible text of every element matching `selector`
fn extract_text(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// Extracts every `<a href>` target as an absolute URL
fn extract_links(document: &Html, page_url: &Url, resolution: LinkResolution) -> Vec<String> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, page_url, resolution))
        .collect()
}
