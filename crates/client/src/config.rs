//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TIFFIN_API_BASE_URL` - Backend base URL including the API prefix
//!   (default: `http://localhost:8186/api`)
//! - `TIFFIN_TOKEN_FILE` - Where the bearer token is persisted
//!   (default: `$HOME/.tiffin/session.json`)
//! - `TIFFIN_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means none
//! - `SENTRY_DSN` - Sentry error tracking DSN (used by the CLI)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend location for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8186/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/` so relative joins keep the prefix.
    pub base_url: Url,
    /// File holding the persisted bearer token.
    pub token_file: PathBuf,
    /// Request timeout; `None` leaves timing to the transport.
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(&get_env_or_default("TIFFIN_API_BASE_URL", DEFAULT_BASE_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("TIFFIN_API_BASE_URL".to_string(), e))?;

        let token_file = get_optional_env("TIFFIN_TOKEN_FILE")
            .map_or_else(default_token_file, PathBuf::from);

        let request_timeout = get_optional_env("TIFFIN_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "TIFFIN_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            base_url,
            token_file,
            request_timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Configuration pointing at `base_url` with default settings otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_string(), e))?;
        Ok(Self {
            base_url,
            token_file: default_token_file(),
            request_timeout: None,
            sentry_dsn: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and normalize the backend base URL.
///
/// A trailing slash is added so that `Url::join("food/all")` appends to the
/// API prefix instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `$HOME/.tiffin/session.json`, or a file in the working directory.
fn default_token_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".tiffin-session.json"),
        |home| PathBuf::from(home).join(".tiffin").join("session.json"),
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
