//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Base URL of the API gateway (default: <http://localhost:8080>)
//! - `SHOPFRONT_SESSION_FILE` - Where the session is persisted
//!   (default: `<data dir>/shopfront/session.json`)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const APP_NAME: &str = "shopfront";
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shopfront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Storefront API settings
    pub api: ApiConfig,
    /// Path of the persisted session file
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Storefront API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto. Always ends in `/`.
    pub base_url: Url,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api = ApiConfig::from_lookup(&lookup)?;
        let session_file = lookup("SHOPFRONT_SESSION_FILE")
            .filter(|value| !value.is_empty())
            .map_or_else(default_session_file, PathBuf::from);
        let sentry_dsn = lookup("SENTRY_DSN").filter(|value| !value.is_empty());

        Ok(Self {
            api,
            session_file,
            sentry_dsn,
        })
    }
}

impl ApiConfig {
    /// Settings for `base_url` with no timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or is not HTTP(S).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("SHOPFRONT_API_URL", base_url)?,
            request_timeout: None,
        })
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("SHOPFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = parse_base_url("SHOPFRONT_API_URL", &raw_url)?;

        let request_timeout = match lookup("SHOPFRONT_REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(raw) => Some(parse_timeout("SHOPFRONT_REQUEST_TIMEOUT_SECS", &raw)?),
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an HTTP(S) base URL, normalizing it to end with `/` so relative
/// endpoint paths join beneath it rather than replacing its last segment.
fn parse_base_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_timeout(var_name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be at least 1 second".to_string(),
        ));
    }

    Ok(Duration::from_secs(secs))
}

/// Platform data directory, e.g. `~/.local/share/shopfront/session.json`.
fn default_session_file() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".shopfront").join(SESSION_FILE_NAME),
        |dir| dir.join(APP_NAME).join(SESSION_FILE_NAME),
    )
}
