//! Records produced by a crawl and written to the manifest.

use serde::{Deserialize, Serialize};

/// A configured account to crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
}

/// A stored media artifact referenced by a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    /// Public URL of the downloaded file.
    pub url: String,
}

/// One scraped post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier taken from the last path segment of the post URL.
    pub id: String,
    /// Caption text, empty when the post has none.
    pub text: String,
    /// Stored media in discovery order, without duplicates.
    pub media_list: Vec<MediaLink>,
    /// RFC 3339 UTC timestamp, or an empty string when unknown.
    pub created_at: String,
}

/// All posts collected for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub username: String,
    pub posts: Vec<Post>,
}

/// Derive a post identifier from its URL or path.
///
/// Query strings and fragments are ignored, as are trailing slashes.
#[must_use]
pub fn post_id_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}
