//! Post and profile crawling on top of a [`BrowserDriver`](crate::browser::BrowserDriver).

pub mod post;
pub mod profile;

use anyhow::{Context, Result};
use url::Url;

pub use post::PostFetcher;
pub use profile::ProfileFetcher;

use crate::constants::MEDIA_EXTENSION;

/// Maximum length of a post id once made filesystem-safe.
const MAX_ID_LENGTH: usize = 200;

/// Resolve a possibly relative link against `base`.
pub(crate) fn resolve_url(base: &Url, link: &str) -> Result<Url> {
    base.join(link)
        .with_context(|| format!("Invalid link {link:?} relative to {base}"))
}

/// Make a post id safe for use in filenames and URLs.
///
/// ASCII alphanumerics, `-` and `_` are kept as they are; every other
/// character becomes an underscore. Distinct safe ids stay distinct.
#[must_use]
pub fn sanitize_post_id(id: &str) -> String {
    if id.is_empty() {
        return "post".to_string();
    }

    id.chars()
        .take(MAX_ID_LENGTH)
        .map(|c| match c {
            '-' | '_' => c,
            c if c.is_ascii_alphanumeric() => c,
            _ => '_',
        })
        .collect()
}

/// Artifact filename for the `index`-th (1-based) media item of a post.
#[must_use]
pub fn media_filename(post_id: &str, index: usize) -> String {
    format!("{}_{index}.{MEDIA_EXTENSION}", sanitize_post_id(post_id))
}
