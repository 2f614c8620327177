//! Structural extraction from rendered page markup.
//!
//! Everything in this module is pure: markup in, fields out. Missing elements
//! and unusable selectors degrade to empty values instead of errors.

pub mod profile;
pub mod snapshot;

use scraper::{ElementRef, Node, Selector};
use tracing::warn;

pub use profile::extract_post_links;
pub use snapshot::{extract_snapshot, PageSnapshot};

/// CSS selectors used to locate fields on post and profile pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    /// Modal or presentation region that scopes all post field queries.
    pub region: String,
    pub caption: String,
    pub timestamp: String,
    pub media: String,
    /// The carousel's "next" control; also the click target when advancing.
    pub next: String,
    /// Anchors in the profile grid that link to individual posts.
    pub profile_links: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            region: r#"[role="dialog"], .single-photo-wrapper, .post-wrapper"#.to_string(),
            caption: ".single-photo-description".to_string(),
            timestamp: ".single-photo-time".to_string(),
            media: ".single-photo.owl-carousel .owl-item img, .single-photo img".to_string(),
            next: r#".owl-nav:not(.disabled) .owl-next:not(.disabled), button[aria-label="Next"]"#
                .to_string(),
            profile_links: ".box-photo[data-s=media] .photo a".to_string(),
        }
    }
}

/// Parse a selector, logging and returning `None` when it is invalid.
pub(crate) fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector = %selector, error = ?e, "Invalid selector, treating as no match");
            None
        }
    }
}

/// Text content of an element with whitespace runs collapsed.
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Free-form text of an element with its line structure preserved.
///
/// `<br>` elements count as line breaks. Horizontal whitespace is collapsed
/// within each line and leading or trailing blank lines are dropped.
pub(crate) fn multiline_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}
