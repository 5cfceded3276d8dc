//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `METEOR_API_URL` - Shop API base URL (default: `http://localhost:5000/api`)
//! - `METEOR_SESSION_FILE` - Where the login session is stored (default: `.meteor-session.json`)
//! - `METEOR_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means the transport default
//! - `METEOR_CURRENCY` - ISO 4217 code used when displaying prices (default: THB)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use meteor_shop_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_SESSION_FILE: &str = ".meteor-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop client configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Shop API base URL, always ending in `/`
    pub api_url: Url,
    /// Path of the persisted login session
    pub session_file: PathBuf,
    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,
    /// Currency used for displaying prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("METEOR_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("METEOR_API_URL".to_string(), e))?;

        let session_file =
            PathBuf::from(get_env_or_default("METEOR_SESSION_FILE", DEFAULT_SESSION_FILE));

        let request_timeout = get_optional_env("METEOR_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                parse_timeout(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("METEOR_REQUEST_TIMEOUT_SECS".to_string(), e)
                })
            })
            .transpose()?;

        let currency = get_env_or_default("METEOR_CURRENCY", "THB")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("METEOR_CURRENCY".to_string(), e))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            session_file,
            request_timeout,
            currency,
            sentry_dsn,
        })
    }

    /// Configuration pointing at the given API with every other setting at
    /// its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not an absolute http(s) URL.
    pub fn for_api(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("METEOR_API_URL".to_string(), e))?;
        Ok(Self {
            api_url,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: None,
            currency: CurrencyCode::default(),
            sentry_dsn: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse the API base URL.
///
/// Only http(s) is accepted. A trailing `/` is added so relative endpoint
/// paths join under the base rather than replacing its last segment.
pub(crate) fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme: {}", url.scheme()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    let secs = raw.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}
