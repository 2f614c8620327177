//! Carousel pagination for a single post.
//!
//! Browsers only mount a few carousel items at a time, so a post's full
//! gallery is assembled from repeated snapshots, clicking "next" between them
//! until the control disappears or the iteration cap is reached.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::browser::BrowserDriver;
use crate::config::Config;
use crate::constants::MAX_ITERATIONS;
use crate::extract::{extract_snapshot, PageSnapshot, SelectorSet};
use crate::pause::Pause;

/// Limits applied while advancing a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    /// Maximum number of snapshot + advance cycles.
    pub max_iterations: usize,
    /// Wait before each click on the next control.
    pub settle_delay: Duration,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            settle_delay: Duration::from_secs(1),
        }
    }
}

impl PaginationSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_iterations: config.max_carousel_pages,
            settle_delay: config.carousel_settle_delay,
        }
    }
}

/// Everything collected from a post's carousel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselContents {
    pub content_text: String,
    pub timestamp_raw: String,
    /// Unique media URLs in first-seen order.
    pub media_urls: Vec<String>,
}

#[derive(Debug, Default)]
struct PaginationState {
    iteration_count: usize,
    seen_media_urls: HashSet<String>,
    media_urls: Vec<String>,
    last_content_text: String,
    last_timestamp_raw: String,
    has_next: bool,
}

impl PaginationState {
    fn absorb(&mut self, snapshot: PageSnapshot) {
        for url in snapshot.media_urls {
            if self.seen_media_urls.insert(url.clone()) {
                self.media_urls.push(url);
            }
        }
        if !snapshot.content_text.is_empty() {
            self.last_content_text = snapshot.content_text;
        }
        if !snapshot.timestamp_raw.is_empty() {
            self.last_timestamp_raw = snapshot.timestamp_raw;
        }
        self.has_next = snapshot.has_next;
    }

    fn finish(self) -> CarouselContents {
        CarouselContents {
            content_text: self.last_content_text,
            timestamp_raw: self.last_timestamp_raw,
            media_urls: self.media_urls,
        }
    }
}

/// Walk the carousel on the current page and collect its contents.
///
/// After each click any navigation it triggers is awaited for at most the
/// settle delay. A click on the next control that fails ends pagination with
/// what has been collected so far; a failed navigation wait does not.
///
/// # Errors
///
/// Returns an error only if the rendered markup cannot be read.
pub async fn paginate(
    driver: &mut dyn BrowserDriver,
    pause: &dyn Pause,
    selectors: &SelectorSet,
    settings: &PaginationSettings,
) -> Result<CarouselContents> {
    let mut state = PaginationState::default();

    while state.iteration_count < settings.max_iterations {
        let markup = driver
            .rendered_markup()
            .await
            .context("Failed to snapshot post page")?;
        state.absorb(extract_snapshot(&markup, selectors));

        if !state.has_next {
            debug!(
                pages = state.iteration_count + 1,
                media = state.media_urls.len(),
                "Reached end of carousel"
            );
            return Ok(state.finish());
        }

        pause.pause(settings.settle_delay).await;

        if let Err(e) = driver.click(&selectors.next).await {
            warn!(
                media = state.media_urls.len(),
                "Could not advance carousel, keeping collected media: {e:#}"
            );
            return Ok(state.finish());
        }

        // Some front ends reload the page on advance; give it until the settle delay.
        if let Err(e) = driver
            .wait_for_navigation_or_timeout(settings.settle_delay)
            .await
        {
            debug!("Navigation after carousel click did not complete: {e:#}");
        }

        state.iteration_count += 1;
    }

    debug!(
        cap = settings.max_iterations,
        media = state.media_urls.len(),
        "Carousel iteration cap reached"
    );
    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(text: &str, timestamp: &str, urls: &[&str], has_next: bool) -> PageSnapshot {
        PageSnapshot {
            content_text: text.to_string(),
            timestamp_raw: timestamp.to_string(),
            media_urls: urls.iter().map(ToString::to_string).collect(),
            has_next,
        }
    }

    #[test]
    fn test_absorb_keeps_first_seen_order() {
        let mut state = PaginationState::default();
        state.absorb(snapshot("", "", &["A", "B"], true));
        state.absorb(snapshot("", "", &["B", "C", "A"], true));
        state.absorb(snapshot("", "", &["C", "D"], false));

        assert_eq!(state.finish().media_urls, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_absorb_keeps_latest_non_empty_fields() {
        let mut state = PaginationState::default();
        state.absorb(snapshot("", "", &[], true));
        state.absorb(snapshot("caption", "2 days ago", &[], true));
        state.absorb(snapshot("", "", &[], true));

        let contents = state.finish();
        assert_eq!(contents.content_text, "caption");
        assert_eq!(contents.timestamp_raw, "2 days ago");
    }

    #[test]
    fn test_absorb_tracks_next_control() {
        let mut state = PaginationState::default();
        state.absorb(snapshot("", "", &[], true));
        assert!(state.has_next);
        state.absorb(snapshot("", "", &[], false));
        assert!(!state.has_next);
    }
}
