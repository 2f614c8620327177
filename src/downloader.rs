//! Media downloads for discovered carousel items.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::constants::ARCHIVAL_USER_AGENT;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetches one resource and stores it at a destination path.
///
/// Each call makes exactly one attempt; callers decide what a failure means.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download `url` to `destination`, overwriting any existing file.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, url: &str, destination: &Path) -> Result<u64, DownloadError>;
}

/// Downloader using a shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(ARCHIVAL_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaDownloader for HttpDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64, DownloadError> {
        let request_error = |source| DownloadError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(request_error)?;

        tokio::fs::write(destination, &body)
            .await
            .map_err(|source| DownloadError::Io {
                path: destination.to_path_buf(),
                source,
            })?;

        debug!(url = %url, path = %destination.display(), size = body.len(), "Media downloaded");

        Ok(body.len() as u64)
    }
}
