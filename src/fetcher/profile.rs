use anyhow::{Context, Result};
use tracing::info;

use super::{resolve_url, PostFetcher};
use crate::browser::{navigate_with_retry, BrowserDriver, WaitPolicy};
use crate::extract::extract_post_links;
use crate::models::Post;

/// Fetches the most recent posts of a profile, one after another.
#[derive(Clone, Copy)]
pub struct ProfileFetcher<'a> {
    posts: PostFetcher<'a>,
}

impl<'a> ProfileFetcher<'a> {
    #[must_use]
    pub fn new(posts: PostFetcher<'a>) -> Self {
        Self { posts }
    }

    /// Fetch up to the configured number of posts for `username`, in the
    /// order they appear on the profile page.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile page or any of its posts fails to
    /// load; remaining posts are not fetched.
    pub async fn fetch(&self, driver: &mut dyn BrowserDriver, username: &str) -> Result<Vec<Post>> {
        let config = self.posts.config;
        let profile_path = format!("profile/{}", urlencoding::encode(username));
        let profile_url = resolve_url(&config.host_url, &profile_path)?;

        navigate_with_retry(
            driver,
            self.posts.pause,
            profile_url.as_str(),
            WaitPolicy::NetworkIdle,
            config.profile_navigation_timeout,
            config.navigation_retries,
            config.retry_delay,
        )
        .await
        .with_context(|| format!("Failed to load profile {profile_url}"))?;

        let markup = driver
            .rendered_markup()
            .await
            .with_context(|| format!("Failed to read profile {profile_url}"))?;

        let mut links = extract_post_links(&markup, &self.posts.selectors.profile_links);
        let found = links.len();
        links.truncate(config.max_posts_per_profile);

        info!(
            username = %username,
            found,
            processing = links.len(),
            "Collected post links"
        );

        let mut posts = Vec::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            if i > 0 {
                self.posts.pause.pause(config.post_delay).await;
            }

            info!(username = %username, link = %link, "Current link");
            posts.push(self.posts.fetch(driver, link).await?);
        }

        Ok(posts)
    }
}
