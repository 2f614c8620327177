//! [`BrowserDriver`] backed by a Chrome/Chromium instance over CDP.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::{BrowserDriver, WaitPolicy};
use crate::config::Config;
use crate::constants::ARCHIVAL_USER_AGENT;

/// Default window width in pixels.
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;

/// Default window height in pixels.
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;

/// Resource count must stay unchanged this long for the network to count as idle.
const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);

const NETWORK_POLL_INTERVAL: Duration = Duration::from_millis(100);

const READY_STATE_SCRIPT: &str =
    "[document.readyState, performance.getEntriesByType('resource').length]";

/// Browser launch configuration.
#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Path to Chrome/Chromium executable (None for auto-detection).
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Timeout for individual CDP requests.
    pub request_timeout: Duration,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ChromiumConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            headless: config.headless,
            request_timeout: config.navigation_timeout,
            ..Self::default()
        }
    }
}

/// A launched browser with the single page every fetcher shares.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch the browser and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be started.
    pub async fn launch(config: &ChromiumConfig) -> Result<Self> {
        info!(headless = config.headless, "Launching browser");

        let mut config_builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(config.request_timeout)
            .no_sandbox()
            .disable_default_args()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-sync")
            .arg("--mute-audio")
            .arg(format!("--user-agent={ARCHIVAL_USER_AGENT}"));

        config_builder = if config.headless {
            config_builder.arg("--headless=new")
        } else {
            config_builder.with_head()
        };

        if let Some(ref chrome_path) = config.chrome_path {
            config_builder = config_builder.chrome_executable(chrome_path);
        }

        let browser_config = config_builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch browser")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to create browser page")?;

        info!("Browser ready");

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Close the page and the browser.
    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            warn!("Failed to close page: {e}");
        }
        if let Err(e) = self.browser.close().await {
            error!("Failed to close browser: {e}");
        } else {
            info!("Browser shutdown complete");
        }
        self.handler.abort();
    }

    /// Poll the page until loading is complete and no new resources appear
    /// for [`NETWORK_QUIET_WINDOW`].
    async fn wait_for_network_idle(&self) -> Result<()> {
        let mut last_count = None;
        let mut quiet_since = Instant::now();

        loop {
            let (ready_state, count): (String, u64) = self
                .page
                .evaluate(READY_STATE_SCRIPT)
                .await
                .context("Failed to read page load state")?
                .into_value()
                .map_err(|e| anyhow::anyhow!("Unexpected page load state: {e:?}"))?;

            if last_count != Some(count) {
                last_count = Some(count);
                quiet_since = Instant::now();
            } else if ready_state == "complete" && quiet_since.elapsed() >= NETWORK_QUIET_WINDOW {
                debug!(resources = count, "Network idle");
                return Ok(());
            }

            tokio::time::sleep(NETWORK_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str, wait: WaitPolicy, timeout: Duration) -> Result<()> {
        debug!(url = %url, ?wait, "Navigating");

        let navigation = async {
            self.page
                .goto(url)
                .await
                .with_context(|| format!("Failed to navigate to {url}"))?;
            // `goto` completing is all DomContentLoaded waits for.
            if wait == WaitPolicy::NetworkIdle {
                self.wait_for_network_idle().await?;
            }
            Ok::<(), anyhow::Error>(())
        };

        tokio::time::timeout(timeout, navigation)
            .await
            .with_context(|| format!("Navigation to {url} timed out after {timeout:?}"))?
    }

    async fn rendered_markup(&mut self) -> Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read rendered markup")
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.page
            .find_element(selector)
            .await
            .with_context(|| format!("No element matches {selector}"))?
            .click()
            .await
            .with_context(|| format!("Failed to click {selector}"))?;
        Ok(())
    }

    async fn wait_for_navigation_or_timeout(&mut self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(result) => {
                result.context("Navigation wait failed")?;
                Ok(())
            }
            Err(_) => {
                debug!(?timeout, "No navigation before timeout");
                Ok(())
            }
        }
    }
}
