//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use profile_post_archiver::browser::{BrowserDriver, WaitPolicy};
use profile_post_archiver::downloader::{DownloadError, MediaDownloader};
use profile_post_archiver::pause::Pause;

/// In-memory browser serving scripted markup per URL.
///
/// Each URL maps to a sequence of renders; every successful click on the
/// current page advances to the next render, staying on the last one.
#[derive(Default)]
pub struct ScriptedBrowser {
    pages: HashMap<String, Vec<String>>,
    failing_navigations: HashMap<String, u32>,
    current: Option<(String, usize)>,
    pub fail_clicks: bool,
    pub fail_navigation_waits: bool,
    pub navigations: Vec<(String, WaitPolicy)>,
    pub clicks: Vec<String>,
    pub navigation_waits: Vec<Duration>,
    pub snapshots: usize,
}

impl ScriptedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, renders: Vec<String>) -> Self {
        self.pages.insert(url.to_string(), renders);
        self
    }

    /// Make the next `times` navigations to `url` fail.
    pub fn failing(mut self, url: &str, times: u32) -> Self {
        self.failing_navigations.insert(url.to_string(), times);
        self
    }

    pub fn navigated_urls(&self) -> Vec<String> {
        self.navigations.iter().map(|(url, _)| url.clone()).collect()
    }
}

#[async_trait]
impl BrowserDriver for ScriptedBrowser {
    async fn navigate(&mut self, url: &str, wait: WaitPolicy, _timeout: Duration) -> Result<()> {
        self.navigations.push((url.to_string(), wait));

        if let Some(remaining) = self.failing_navigations.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(anyhow!("net::ERR_CONNECTION_RESET at {url}"));
            }
        }

        if !self.pages.contains_key(url) {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED at {url}"));
        }

        self.current = Some((url.to_string(), 0));
        Ok(())
    }

    async fn rendered_markup(&mut self) -> Result<String> {
        self.snapshots += 1;
        let (url, index) = self.current.as_ref().ok_or_else(|| anyhow!("no page loaded"))?;
        let renders = &self.pages[url];
        Ok(renders[(*index).min(renders.len() - 1)].clone())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.clicks.push(selector.to_string());
        if self.fail_clicks {
            return Err(anyhow!("No element matches {selector}"));
        }
        if let Some((_, index)) = self.current.as_mut() {
            *index += 1;
        }
        Ok(())
    }

    async fn wait_for_navigation_or_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.navigation_waits.push(timeout);
        if self.fail_navigation_waits {
            return Err(anyhow!("Navigation wait failed"));
        }
        Ok(())
    }
}

/// Pause that returns immediately and remembers what it was asked to wait.
#[derive(Default)]
pub struct RecordingPause {
    pub pauses: Mutex<Vec<Duration>>,
}

impl RecordingPause {
    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

/// Downloader that records requests and fails for chosen URLs.
#[derive(Default)]
pub struct FakeDownloader {
    failing: HashSet<String>,
    pub requests: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeDownloader {
    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaDownloader for FakeDownloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<u64, DownloadError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));

        if self.failing.contains(url) {
            return Err(DownloadError::Io {
                path: destination.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated failure"),
            });
        }
        Ok(4)
    }
}

/// Markup of a post page with a carousel.
pub fn post_page(caption: &str, time: &str, urls: &[&str], has_next: bool) -> String {
    let items: String = urls
        .iter()
        .map(|url| format!(r#"<div class="owl-item"><img src="{url}"></div>"#))
        .collect();
    let next_class = if has_next { "owl-next" } else { "owl-next disabled" };
    let caption = if caption.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="single-photo-description">{caption}</div>"#)
    };
    let time = if time.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="single-photo-time">{time}</div>"#)
    };

    format!(
        r#"<html><body>
            <div class="single-photo-wrapper">
                <div class="single-photo owl-carousel">
                    <div class="owl-stage">{items}</div>
                    <div class="owl-nav"><button class="owl-prev">prev</button><button class="{next_class}">next</button></div>
                </div>
                {caption}
                {time}
            </div>
        </body></html>"#
    )
}

/// Markup of a profile page linking to `hrefs`.
pub fn profile_page(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="box-photo" data-s="media"><div class="photo"><a href="{href}"><img src="/thumb.jpg"></a></div></div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div class="content box-photos-wrapper">{items}</div></body></html>"#)
}
