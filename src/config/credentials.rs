//! API key resolution.
//!
//! The Gemini credential is read once at startup. Its absence is a fatal
//! startup condition, reported through [`ConfigError::MissingApiKey`].

use super::loader::ConfigError;
use super::types::ModelConfig;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Where the resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment,
    ConfigFile,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::ConfigFile => "config file",
        }
    }
}

impl ModelConfig {
    /// Resolve the API key from the process environment, then the config file.
    pub fn resolve_api_key(&self) -> Result<(SecureString, ApiKeySource), ConfigError> {
        let env_value = std::env::var(&self.api_key_env).ok();
        self.resolve_api_key_from(env_value.as_deref())
    }

    /// Resolution with the environment lookup already done.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key_from(
        &self,
        env_value: Option<&str>,
    ) -> Result<(SecureString, ApiKeySource), ConfigError> {
        if let Some(key) = env_value.map(str::trim).filter(|k| !k.is_empty()) {
            return Ok((SecureString::new(key.to_string()), ApiKeySource::Environment));
        }

        if let Some(key) = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            return Ok((SecureString::new(key.to_string()), ApiKeySource::ConfigFile));
        }

        Err(ConfigError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })
    }
}
