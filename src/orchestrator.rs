//! Runs the crawl over every configured account and writes the manifest.

use anyhow::Result;
use tracing::{error, info};

use crate::browser::BrowserDriver;
use crate::config::{AccountErrorPolicy, Config};
use crate::fetcher::ProfileFetcher;
use crate::manifest::write_manifest;
use crate::models::{Account, ProfileResult};

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Accounts that were crawled, in configuration order.
    pub results: Vec<ProfileResult>,
    /// Accounts skipped after a fatal error.
    pub failed_accounts: Vec<String>,
}

/// Crawl `accounts` in order and write the manifest to the output directory.
///
/// With [`AccountErrorPolicy::Abort`] the first failing account ends the run;
/// accounts completed before it are only on disk when
/// `flush_each_account` is set.
///
/// # Errors
///
/// Returns the failing account's error under the abort policy, or an error if
/// the manifest cannot be written.
pub async fn run(
    config: &Config,
    accounts: &[Account],
    driver: &mut dyn BrowserDriver,
    fetcher: ProfileFetcher<'_>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for account in accounts {
        info!(username = %account.username, "Crawling account");

        match fetcher.fetch(driver, &account.username).await {
            Ok(posts) => {
                info!(username = %account.username, posts = posts.len(), "Account complete");
                summary.results.push(ProfileResult {
                    username: account.username.clone(),
                    posts,
                });
                if config.flush_each_account {
                    write_manifest(&config.output_dir, &summary.results).await?;
                }
            }
            Err(e) => match config.on_account_error {
                AccountErrorPolicy::Abort => {
                    error!(username = %account.username, "Account failed, aborting run: {e:#}");
                    return Err(e.context(format!("Crawl of {} failed", account.username)));
                }
                AccountErrorPolicy::Skip => {
                    error!(username = %account.username, "Account failed, skipping: {e:#}");
                    summary.failed_accounts.push(account.username.clone());
                }
            },
        }
    }

    write_manifest(&config.output_dir, &summary.results).await?;

    info!(
        accounts = summary.results.len(),
        failed = summary.failed_accounts.len(),
        "Run complete"
    );

    Ok(summary)
}
