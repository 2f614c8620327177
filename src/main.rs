use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use profile_post_archiver::browser::{ChromiumConfig, ChromiumDriver};
use profile_post_archiver::config::Config;
use profile_post_archiver::downloader::HttpDownloader;
use profile_post_archiver::extract::SelectorSet;
use profile_post_archiver::fetcher::{PostFetcher, ProfileFetcher};
use profile_post_archiver::manifest::load_accounts;
use profile_post_archiver::orchestrator;
use profile_post_archiver::pause::TokioPause;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting profile-post-archiver");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        host = %config.host_url,
        output_dir = %config.output_dir.display(),
        max_posts = config.max_posts_per_profile,
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;

    let accounts = load_accounts(&config.accounts_file).await?;
    if accounts.is_empty() {
        warn!(path = %config.accounts_file.display(), "No accounts configured");
    }
    info!(accounts = accounts.len(), "Accounts loaded");

    let downloader = HttpDownloader::new(config.download_timeout)?;
    let selectors = SelectorSet::default();
    let pause = TokioPause;
    let fetcher = ProfileFetcher::new(PostFetcher::new(&config, &selectors, &downloader, &pause));

    let mut driver = ChromiumDriver::launch(&ChromiumConfig::from_config(&config)).await?;
    let outcome = orchestrator::run(&config, &accounts, &mut driver, fetcher).await;
    driver.close().await;

    let summary = outcome?;
    if !summary.failed_accounts.is_empty() {
        warn!(accounts = ?summary.failed_accounts, "Some accounts were skipped");
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,profile_post_archiver=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
