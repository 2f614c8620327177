//! Browser automation contract used by the fetchers.
//!
//! The fetchers only ever talk to a [`BrowserDriver`]; the production
//! implementation lives in [`chromium`], tests script their own.

pub mod chromium;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

pub use chromium::{ChromiumConfig, ChromiumDriver};

use crate::pause::Pause;

/// How long navigation waits before the page is considered ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Initial document parsed; late resources may still be loading.
    ///
    /// The chromium driver relies on the completion of `Page::goto` for this
    /// and adds no separate wait on the `DOMContentLoaded` event.
    DomContentLoaded,
    /// No new network resources for a short quiet window.
    NetworkIdle,
}

/// A single browser page driven sequentially.
///
/// Every method takes `&mut self`: one page has one user at a time.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Navigate the page to `url` and wait according to `wait`.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation fails or `timeout` elapses.
    async fn navigate(&mut self, url: &str, wait: WaitPolicy, timeout: Duration) -> Result<()>;

    /// Serialized markup of the page as currently rendered.
    async fn rendered_markup(&mut self) -> Result<String>;

    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Wait for an in-flight navigation, giving up quietly after `timeout`.
    async fn wait_for_navigation_or_timeout(&mut self, timeout: Duration) -> Result<()>;
}

/// Navigate with up to `retries` extra attempts, pausing `retry_delay` between them.
///
/// # Errors
///
/// Returns the last navigation error once every attempt has failed.
pub async fn navigate_with_retry(
    driver: &mut dyn BrowserDriver,
    pause: &dyn Pause,
    url: &str,
    wait: WaitPolicy,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
) -> Result<()> {
    let mut attempt = 0;
    loop {
        match driver.navigate(url, wait, timeout).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!(url = %url, attempt, retries, "Navigation failed, retrying: {e:#}");
                pause.pause(retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
