//! Account list input and manifest output.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::constants::{MANIFEST_FILENAME, MANIFEST_MIN_FILENAME};
use crate::models::{Account, ProfileResult};

/// Load the accounts to crawl from a JSON array of `{ "username": ... }`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid account list.
pub async fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read accounts file: {}", path.display()))?;
    let accounts: Vec<Account> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse accounts file: {}", path.display()))?;
    Ok(accounts)
}

/// Write the manifest to `output_dir`, both pretty-printed and minified.
///
/// # Errors
///
/// Returns an error if serialization or either write fails.
pub async fn write_manifest(output_dir: &Path, results: &[ProfileResult]) -> Result<()> {
    let minified = serde_json::to_string(results).context("Failed to serialize manifest")?;
    let pretty = serde_json::to_string_pretty(results).context("Failed to serialize manifest")?;

    let min_path = output_dir.join(MANIFEST_MIN_FILENAME);
    tokio::fs::write(&min_path, minified)
        .await
        .with_context(|| format!("Failed to write manifest: {}", min_path.display()))?;

    let pretty_path = output_dir.join(MANIFEST_FILENAME);
    tokio::fs::write(&pretty_path, pretty)
        .await
        .with_context(|| format!("Failed to write manifest: {}", pretty_path.display()))?;

    info!(
        path = %pretty_path.display(),
        accounts = results.len(),
        "Manifest written"
    );

    Ok(())
}
