//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `COFFEECRAFT_HOST` - Bind address (default: 127.0.0.1)
//! - `COFFEECRAFT_PORT` - Listen port (default: 3000)
//! - `COFFEECRAFT_STORAGE_DIR` - Directory backing the key-value store (default: .coffeecraft)
//! - `COFFEECRAFT_CART_KEY` - Storage key the cart is saved under (default: cart)
//! - `COFFEECRAFT_CATALOG_PATH` - JSON catalog file (default: built-in catalog)
//! - `COFFEECRAFT_CHECKOUT_DELAY_MS` - Delay before the cart is cleared after checkout (default: 2000)
//! - `COFFEECRAFT_NOTIFICATION_LOG_SIZE` - Number of recent cart events kept (default: 50)
//! - `COFFEECRAFT_LOG_FORMAT` - `text` or `json` (default: text)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::storage;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STORAGE_DIR: &str = ".coffeecraft";
const DEFAULT_CART_KEY: &str = "cart";
const DEFAULT_CHECKOUT_DELAY_MS: u64 = 2000;
const DEFAULT_NOTIFICATION_LOG_SIZE: usize = 50;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the file-backed key-value store
    pub storage_dir: PathBuf,
    /// Key the cart is persisted under
    pub cart_key: String,
    /// Optional catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// How long after a successful checkout the cart is cleared
    pub checkout_delay: Duration,
    /// Capacity of the recent-notification log
    pub notification_log_size: usize,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_path: None,
            checkout_delay: Duration::from_millis(DEFAULT_CHECKOUT_DELAY_MS),
            notification_log_size: DEFAULT_NOTIFICATION_LOG_SIZE,
            log_format: LogFormat::Text,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` naming the first variable that fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_or(&lookup, "COFFEECRAFT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "COFFEECRAFT_PORT", defaults.port)?;
        let storage_dir = lookup("COFFEECRAFT_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.storage_dir, PathBuf::from);
        let cart_key = lookup("COFFEECRAFT_CART_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.cart_key);
        if !storage::is_valid_key(&cart_key) {
            return Err(ConfigError::InvalidEnvVar(
                "COFFEECRAFT_CART_KEY".to_string(),
                format!("{cart_key:?} may only contain ASCII letters, digits, '-' and '_'"),
            ));
        }
        let catalog_path = lookup("COFFEECRAFT_CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let checkout_delay_ms = parse_or(
            &lookup,
            "COFFEECRAFT_CHECKOUT_DELAY_MS",
            DEFAULT_CHECKOUT_DELAY_MS,
        )?;
        let notification_log_size = parse_or(
            &lookup,
            "COFFEECRAFT_NOTIFICATION_LOG_SIZE",
            defaults.notification_log_size,
        )?;
        if notification_log_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "COFFEECRAFT_NOTIFICATION_LOG_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let log_format = parse_or(&lookup, "COFFEECRAFT_LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            host,
            port,
            storage_dir,
            cart_key,
            catalog_path,
            checkout_delay: Duration::from_millis(checkout_delay_ms),
            notification_log_size,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse `key` if it is set, falling back to `default` otherwise.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}
