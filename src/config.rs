use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::MAX_ITERATIONS;

/// Default front end the profiles are read from.
pub const DEFAULT_HOST_URL: &str = "https://www.picuki.com/";

/// Default public location the artifacts directory is published to.
pub const DEFAULT_STORAGE_BASE_URL: &str =
    "https://pmgo-professor-willow.github.io/data-instagram-posts/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
    #[error("failed to parse {name} as URL: {source}")]
    ParseUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Target site
    pub host_url: Url,
    pub storage_base_url: Url,

    // Paths
    pub output_dir: PathBuf,
    pub accounts_file: PathBuf,

    // Browser
    pub chrome_path: Option<String>,
    pub headless: bool,

    // Crawl limits
    pub max_posts_per_profile: usize,
    pub max_carousel_pages: usize,

    // Delays
    pub carousel_settle_delay: Duration,
    pub post_delay: Duration,

    // Navigation
    pub navigation_timeout: Duration,
    pub profile_navigation_timeout: Duration,
    pub navigation_retries: u32,
    pub retry_delay: Duration,

    // Downloads
    pub download_timeout: Duration,

    // Run policy
    pub on_account_error: AccountErrorPolicy,
    pub flush_each_account: bool,
}

/// What the run does when an account fails with a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountErrorPolicy {
    /// Stop the run and surface the error
    Abort,
    /// Log the failure, leave the account out of the manifest, and continue
    Skip,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Target site
            host_url: parse_env_url("HOST_URL", DEFAULT_HOST_URL)?,
            storage_base_url: parse_env_url("STORAGE_BASE_URL", DEFAULT_STORAGE_BASE_URL)?,

            // Paths
            output_dir: PathBuf::from(env_or_default("OUTPUT_DIR", "./artifacts")),
            accounts_file: PathBuf::from(env_or_default(
                "ACCOUNTS_FILE",
                "./data/instagram-users.json",
            )),

            // Browser
            chrome_path: optional_env("CHROME_PATH").or_else(|| optional_env("PUPPETEER_EXEC_PATH")),
            headless: parse_env_bool("HEADLESS", true)?,

            // Crawl limits
            max_posts_per_profile: parse_env_usize("MAX_POSTS_PER_PROFILE", 10)?,
            max_carousel_pages: parse_env_usize("MAX_CAROUSEL_PAGES", MAX_ITERATIONS)?,

            // Delays
            carousel_settle_delay: Duration::from_millis(parse_env_u64("CAROUSEL_SETTLE_MS", 1000)?),
            post_delay: Duration::from_secs(parse_env_u64("POST_DELAY_SECS", 10)?),

            // Navigation
            navigation_timeout: Duration::from_secs(parse_env_u64("NAVIGATION_TIMEOUT_SECS", 60)?),
            profile_navigation_timeout: Duration::from_secs(parse_env_u64(
                "PROFILE_NAVIGATION_TIMEOUT_SECS",
                180,
            )?),
            navigation_retries: parse_env_u32("NAVIGATION_RETRIES", 0)?,
            retry_delay: Duration::from_secs(parse_env_u64("RETRY_DELAY_SECS", 5)?),

            // Downloads
            download_timeout: Duration::from_secs(parse_env_u64("DOWNLOAD_TIMEOUT_SECS", 60)?),

            // Run policy
            on_account_error: parse_account_error_policy(&env_or_default(
                "ON_ACCOUNT_ERROR",
                "abort",
            ))?,
            flush_each_account: parse_env_bool("FLUSH_EACH_ACCOUNT", true)?,
        })
    }

    /// Configuration for tests: no delays, no retries, local paths.
    ///
    /// # Panics
    ///
    /// Never in practice; the default URLs are constants that always parse.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host_url: Url::parse(DEFAULT_HOST_URL).expect("default host URL is valid"),
            storage_base_url: Url::parse(DEFAULT_STORAGE_BASE_URL)
                .expect("default storage URL is valid"),
            output_dir: PathBuf::from("./artifacts"),
            accounts_file: PathBuf::from("./data/instagram-users.json"),
            chrome_path: None,
            headless: true,
            max_posts_per_profile: 10,
            max_carousel_pages: MAX_ITERATIONS,
            carousel_settle_delay: Duration::ZERO,
            post_delay: Duration::ZERO,
            navigation_timeout: Duration::from_secs(5),
            profile_navigation_timeout: Duration::from_secs(5),
            navigation_retries: 0,
            retry_delay: Duration::ZERO,
            download_timeout: Duration::from_secs(5),
            on_account_error: AccountErrorPolicy::Abort,
            flush_each_account: true,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_posts_per_profile == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_POSTS_PER_PROFILE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_carousel_pages == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_CAROUSEL_PAGES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !self.storage_base_url.path().ends_with('/') {
            return Err(ConfigError::InvalidValue {
                name: "STORAGE_BASE_URL".to_string(),
                message: "must end with '/' so filenames join beneath it".to_string(),
            });
        }
        if self.host_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                name: "HOST_URL".to_string(),
                message: "must be an absolute http(s) URL".to_string(),
            });
        }
        Ok(())
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_url(name: &str, default: &str) -> Result<Url, ConfigError> {
    let value = env_or_default(name, default);
    Url::parse(&value).map_err(|e| ConfigError::ParseUrl {
        name: name.to_string(),
        source: e,
    })
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_account_error_policy(value: &str) -> Result<AccountErrorPolicy, ConfigError> {
    match value.to_lowercase().as_str() {
        "abort" => Ok(AccountErrorPolicy::Abort),
        "skip" => Ok(AccountErrorPolicy::Skip),
        _ => Err(ConfigError::InvalidValue {
            name: "ON_ACCOUNT_ERROR".to_string(),
            message: format!("must be 'abort' or 'skip', got '{value}'"),
        }),
    }
}
