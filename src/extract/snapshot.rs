use std::collections::HashSet;

use scraper::{ElementRef, Html};

use super::{collapsed_text, compile, multiline_text, SelectorSet};

/// Attributes carrying a machine-readable timestamp, in preference order.
const TIMESTAMP_ATTRIBUTES: &[&str] = &["datetime", "data-time", "title"];

/// Fields read from one rendering of a post page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub content_text: String,
    pub timestamp_raw: String,
    /// Media currently mounted in the carousel, in document order.
    pub media_urls: Vec<String>,
    pub has_next: bool,
}

/// Extract a [`PageSnapshot`] from the full markup of the current page.
///
/// Queries are scoped to the first element matching `selectors.region`; when
/// the page has no such region the whole document is searched.
#[must_use]
pub fn extract_snapshot(markup: &str, selectors: &SelectorSet) -> PageSnapshot {
    let document = Html::parse_document(markup);
    let region = compile(&selectors.region);
    let scope = region
        .as_ref()
        .and_then(|region| document.select(region).next())
        .unwrap_or_else(|| document.root_element());

    PageSnapshot {
        content_text: first_match(scope, &selectors.caption)
            .map(multiline_text)
            .unwrap_or_default(),
        timestamp_raw: first_match(scope, &selectors.timestamp)
            .map(timestamp_value)
            .unwrap_or_default(),
        media_urls: media_urls(scope, &selectors.media),
        has_next: first_match(scope, &selectors.next).is_some(),
    }
}

fn first_match<'a>(scope: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = compile(selector)?;
    let found = scope.select(&selector).next();
    found
}

fn timestamp_value(element: ElementRef<'_>) -> String {
    TIMESTAMP_ATTRIBUTES
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map_or_else(|| collapsed_text(element), ToString::to_string)
}

fn media_urls(scope: ElementRef<'_>, selector: &str) -> Vec<String> {
    let Some(selector) = compile(selector) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for image in scope.select(&selector) {
        let src = ["src", "data-src"]
            .iter()
            .filter_map(|name| image.value().attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty() && !value.starts_with("data:"));

        if let Some(src) = src {
            if seen.insert(src.to_string()) {
                urls.push(src.to_string());
            }
        }
    }

    urls
}
