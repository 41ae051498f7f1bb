use serde::{Deserialize, Serialize};

use crate::prompt::PromptProfile;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prompts: PromptProfile,
}

/// Remote model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "gemini-2.0-flash").
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Base URL for the Gemini API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sampling temperature sent with every request.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Timeout for a single round trip in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Direct API key. The environment variable wins when both are set.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Retry/backoff settings for rate-limited calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total remote attempts before giving up (default: 6).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Exponential base; the wait before retry `n` is `base^n` seconds.
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,
    /// Upper bound for a computed exponential wait in seconds (default: 60).
    #[serde(default = "default_ceiling")]
    pub ceiling_seconds: f64,
    /// Jitter is drawn uniformly from `[0, jitter_seconds)`.
    #[serde(default = "default_jitter")]
    pub jitter_seconds: f64,
    /// Added to a server-suggested retry delay.
    #[serde(default = "default_retry_after_buffer")]
    pub retry_after_buffer_seconds: f64,
}

/// Submission throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Minimum spacing between accepted requests in seconds (default: 10).
    #[serde(default = "default_cooldown_interval")]
    pub interval_seconds: u64,
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `studybuddy serve` (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_model_name() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_timeout() -> u32 {
    60
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_attempts() -> u32 {
    6
}

fn default_backoff_base() -> f64 {
    2.0
}

fn default_ceiling() -> f64 {
    60.0
}

fn default_jitter() -> f64 {
    1.0
}

fn default_retry_after_buffer() -> f64 {
    1.0
}

fn default_cooldown_interval() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "127.0.0.1:8501".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base: default_backoff_base(),
            ceiling_seconds: default_ceiling(),
            jitter_seconds: default_jitter(),
            retry_after_buffer_seconds: default_retry_after_buffer(),
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_cooldown_interval(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}
