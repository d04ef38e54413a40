//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LOTUS_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `LOTUS_HOST` - Bind address (default: 127.0.0.1)
//! - `LOTUS_PORT` - Listen port (default: 8080)
//! - `LOTUS_BASE_URL` - Public URL used to build absolute image links
//!   (default: `http://localhost:<port>`)
//! - `LOTUS_UPLOAD_DIR` - Directory for uploaded images (default: uploads)
//! - `LOTUS_LIST_CACHE_TTL_SECS` - Product list cache TTL (default: 60)
//! - `LOTUS_CHECKOUT_CLEAR` - Cart clearing scope at checkout: `all` clears
//!   the whole cart, `ordered` only the checked-out products (default: all)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart clearing scope applied when a checkout commits.
///
/// The source system cleared the entire cart, even lines that were not part
/// of the checked-out order; `Ordered` restricts clearing to the ordered
/// products instead of silently changing that behavior for everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartClearMode {
    /// Delete every cart line belonging to the user.
    #[default]
    All,
    /// Delete only the cart lines for products present in the order.
    Ordered,
}

impl std::str::FromStr for CartClearMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "ordered" => Ok(Self::Ordered),
            _ => Err(format!("expected 'all' or 'ordered', got '{s}'")),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build absolute image links
    pub base_url: String,
    /// Directory where uploaded images are stored
    pub upload_dir: PathBuf,
    /// TTL for the cached product list pages, in seconds
    pub list_cache_ttl_secs: u64,
    /// Cart clearing scope applied at checkout
    pub checkout_clear: CartClearMode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry tracing sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("LOTUS_DATABASE_URL")?;
        let host = get_env_or_default("LOTUS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LOTUS_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_PORT".to_string(), e.to_string()))?;

        let base_url = get_env_or_default("LOTUS_BASE_URL", &format!("http://localhost:{port}"));
        validate_base_url(&base_url)?;

        let upload_dir = PathBuf::from(get_env_or_default("LOTUS_UPLOAD_DIR", "uploads"));

        let list_cache_ttl_secs = get_env_or_default("LOTUS_LIST_CACHE_TTL_SECS", "60")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LOTUS_LIST_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        let checkout_clear = get_env_or_default("LOTUS_CHECKOUT_CLEAR", "all")
            .parse::<CartClearMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_CHECKOUT_CLEAR".to_string(), e))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            upload_dir,
            list_cache_ttl_secs,
            checkout_clear,
            sentry_dsn,
            sentry_environment,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the base URL parses and has a host.
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_BASE_URL".to_string(), e.to_string()))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "LOTUS_BASE_URL".to_string(),
            "must have a host".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_clear_mode_parse() {
        assert_eq!("all".parse::<CartClearMode>().unwrap(), CartClearMode::All);
        assert_eq!(
            "ordered".parse::<CartClearMode>().unwrap(),
            CartClearMode::Ordered
        );
        assert!("everything".parse::<CartClearMode>().is_err());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:8080").is_ok());
        assert!(validate_base_url("https://shop.example.com").is_ok());
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("file:///tmp").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            upload_dir: PathBuf::from("uploads"),
            list_cache_ttl_secs: 60,
            checkout_clear: CartClearMode::All,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }
}
