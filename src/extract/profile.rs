use std::collections::HashSet;

use scraper::Html;

use super::compile;

/// Extract post links from a profile page in document order.
///
/// Empty, fragment-only and `javascript:` hrefs are skipped and repeated
/// links are kept only at their first position.
#[must_use]
pub fn extract_post_links(markup: &str, selector: &str) -> Vec<String> {
    let Some(selector) = compile(selector) else {
        return Vec::new();
    };

    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }
        if seen.insert(href.to_string()) {
            links.push(href.to_string());
        }
    }

    links
}
