use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

use super::{media_filename, resolve_url};
use crate::browser::{navigate_with_retry, BrowserDriver, WaitPolicy};
use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::extract::SelectorSet;
use crate::models::{post_id_from_url, MediaLink, Post};
use crate::pagination::{paginate, PaginationSettings};
use crate::pause::Pause;
use crate::timestamp::{format_timestamp, normalize_timestamp};

/// Fetches a single post: its caption, timestamp and media.
#[derive(Clone, Copy)]
pub struct PostFetcher<'a> {
    pub(crate) config: &'a Config,
    pub(crate) selectors: &'a SelectorSet,
    pub(crate) downloader: &'a dyn MediaDownloader,
    pub(crate) pause: &'a dyn Pause,
}

impl<'a> PostFetcher<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        selectors: &'a SelectorSet,
        downloader: &'a dyn MediaDownloader,
        pause: &'a dyn Pause,
    ) -> Self {
        Self {
            config,
            selectors,
            downloader,
            pause,
        }
    }

    /// Fetch the post at `post_url`, which may be relative to the host URL.
    ///
    /// Media that fail to download are left out of the post.
    ///
    /// # Errors
    ///
    /// Returns an error if the post page cannot be loaded or read.
    pub async fn fetch(&self, driver: &mut dyn BrowserDriver, post_url: &str) -> Result<Post> {
        let url = resolve_url(&self.config.host_url, post_url)?;
        let post_id = post_id_from_url(url.as_str());

        navigate_with_retry(
            driver,
            self.pause,
            url.as_str(),
            WaitPolicy::DomContentLoaded,
            self.config.navigation_timeout,
            self.config.navigation_retries,
            self.config.retry_delay,
        )
        .await
        .with_context(|| format!("Failed to load post {url}"))?;

        let contents = paginate(
            driver,
            self.pause,
            self.selectors,
            &PaginationSettings::from_config(self.config),
        )
        .await
        .with_context(|| format!("Failed to read post {url}"))?;

        let created_at = normalize_timestamp(&contents.timestamp_raw, Utc::now());
        if created_at.is_none() && !contents.timestamp_raw.is_empty() {
            debug!(post_id = %post_id, raw = %contents.timestamp_raw, "Unrecognized timestamp");
        }

        let media_list = self.store_media(&url, &post_id, &contents.media_urls).await;

        info!(
            post_id = %post_id,
            discovered = contents.media_urls.len(),
            stored = media_list.len(),
            "Post fetched"
        );

        Ok(Post {
            id: post_id,
            text: contents.content_text,
            media_list,
            created_at: format_timestamp(created_at),
        })
    }

    /// Download each media item in order and return the public links of the
    /// ones that were stored.
    async fn store_media(&self, page_url: &Url, post_id: &str, sources: &[String]) -> Vec<MediaLink> {
        let mut stored = Vec::with_capacity(sources.len());

        for (i, source) in sources.iter().enumerate() {
            let filename = media_filename(post_id, i + 1);

            let (source_url, public_url) = match (
                resolve_url(page_url, source),
                resolve_url(&self.config.storage_base_url, &filename),
            ) {
                (Ok(source_url), Ok(public_url)) => (source_url, public_url),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(post_id = %post_id, source = %source, "Skipping media: {e:#}");
                    continue;
                }
            };

            let destination = self.config.output_dir.join(&filename);
            match self.downloader.download(source_url.as_str(), &destination).await {
                Ok(_) => stored.push(MediaLink {
                    url: public_url.to_string(),
                }),
                Err(e) => {
                    warn!(post_id = %post_id, source = %source_url, "Media download failed: {e}");
                }
            }
        }

        stored
    }
}
