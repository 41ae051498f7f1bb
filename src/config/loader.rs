use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },

    #[error("{env_var} not found. Export it or set `api_key` under [model] in the config file.")]
    MissingApiKey { env_var: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/studybuddy/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("studybuddy").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - At least one remote attempt is allowed
    /// - Backoff numbers are finite and non-negative, base is at least 1.0
    /// - Temperature is within 0.0..=2.0
    /// - The server bind address parses
    pub fn validate(&self) -> Result<(), ConfigError> {
        let retry = &self.retry;
        if retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts must be at least 1"));
        }
        // Below 1.0 the waits would shrink from one retry to the next.
        if !(retry.backoff_base.is_finite() && retry.backoff_base >= 1.0) {
            return Err(invalid("retry.backoff_base must be at least 1.0"));
        }
        for (name, value) in [
            ("retry.ceiling_seconds", retry.ceiling_seconds),
            ("retry.jitter_seconds", retry.jitter_seconds),
            ("retry.retry_after_buffer_seconds", retry.retry_after_buffer_seconds),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(&format!("{} must be a non-negative number", name)));
            }
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(invalid(&format!(
                "model.temperature {} is outside 0.0..=2.0",
                self.model.temperature
            )));
        }

        if self.model.name.trim().is_empty() {
            return Err(invalid("model.name must not be empty"));
        }

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid(&format!(
                "server.bind_addr '{}' is not a valid socket address",
                self.server.bind_addr
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError {
        message: message.to_string(),
    }
}
