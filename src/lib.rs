//! Profile post archiver library.
//!
//! Drives a browser through a social-media front end, collects each post's
//! caption, timestamp and full carousel of media, downloads the media and
//! describes everything in a JSON manifest.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod browser;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod extract;
pub mod fetcher;
pub mod manifest;
pub mod models;
pub mod orchestrator;
pub mod pagination;
pub mod pause;
pub mod timestamp;
