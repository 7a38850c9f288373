//! # Client Configuration
//!
//! Where the catalog lives and how callers should retry.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the CLI)          │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     KATALOG_ENDPOINT=http://192.168.1.20:3000/productData              │
//! │     KATALOG_TIMEOUT_SECS=5                                             │
//! │     KATALOG_MAX_RETRIES=3                                              │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/katalog/katalog.toml (Linux)                             │
//! │     ~/Library/Application Support/com.katalog.katalog/katalog.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/productData, 10s timeout, no retries         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # katalog.toml
//! [source]
//! endpoint = "http://localhost:3000/productData"
//! timeout_secs = 10
//!
//! [retry]
//! max_retries = 3
//! initial_backoff_ms = 500
//! max_backoff_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/productData";

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "katalog.toml";

// =============================================================================
// Source Settings
// =============================================================================

/// Where and how to fetch the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Full URL of the catalog collection (GET returns a JSON array).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SourceSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Retry Settings
// =============================================================================

/// Retry policy for callers of `CatalogStore::search`.
///
/// The store itself never retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Additional attempts after the first failure (0 = fail fast).
    #[serde(default)]
    pub max_retries: u32,

    /// First backoff interval (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    10
}

impl Default for RetrySettings {
    fn default() -> Self {
        RetrySettings {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl RetrySettings {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.endpoint_url()?;

        if self.source.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.retry.initial_backoff_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "initial_backoff_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Parses the endpoint, accepting only http and https.
    pub fn endpoint_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.source.endpoint)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidEndpoint(format!(
                "Endpoint must use http:// or https://, got: {}://",
                other
            ))),
        }
    }

    /// Applies `KATALOG_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("KATALOG_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding endpoint from environment");
            self.source.endpoint = endpoint;
        }

        if let Some(timeout) = lookup("KATALOG_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.source.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid KATALOG_TIMEOUT_SECS"),
            }
        }

        if let Some(retries) = lookup("KATALOG_MAX_RETRIES") {
            match retries.parse::<u32>() {
                Ok(n) => self.retry.max_retries = n,
                Err(_) => warn!(value = %retries, "Ignoring invalid KATALOG_MAX_RETRIES"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "katalog", "katalog")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
