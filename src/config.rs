//! Store configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Remote call timeout applied when the config does not override it.
fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for the hosted room store.
#[derive(Debug, Clone, Getters, Deserialize)]
pub struct StoreConfig {
    /// Class endpoint URL holding the room records.
    base_url: String,

    /// Application id sent as the `X-LC-Id` header.
    app_id: String,

    /// Application key sent as the `X-LC-Key` header.
    app_key: String,

    /// Upper bound for every remote call, in seconds.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl StoreConfig {
    /// Creates a configuration with the default timeout.
    pub fn new(base_url: String, app_id: String, app_key: String) -> Self {
        Self {
            base_url,
            app_id,
            app_key,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading store config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;

        info!(base_url = %config.base_url, "Store config loaded");
        Ok(config)
    }

    /// Builds configuration from `TTT_BASE_URL`, `TTT_APP_ID`,
    /// `TTT_APP_KEY` and optionally `TTT_TIMEOUT_SECS`.
    #[instrument]
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = require_env("TTT_BASE_URL")?;
        let app_id = require_env("TTT_APP_ID")?;
        let app_key = require_env("TTT_APP_KEY")?;

        let timeout_secs = match std::env::var("TTT_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid TTT_TIMEOUT_SECS: {e}")))?,
            Err(_) => default_timeout_secs(),
        };

        info!(base_url = %base_url, "Store config loaded from environment");
        Ok(Self {
            base_url,
            app_id,
            app_key,
            timeout_secs,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .map_err(|_| ConfigError::new(format!("{name} environment variable not set")))
}

/// Configuration error with caller location.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
