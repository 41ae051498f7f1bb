//! Configuration: TOML file, defaults, and credential resolution.

mod credentials;
mod loader;
mod types;

pub use credentials::{ApiKeySource, SecureString};
pub use loader::ConfigError;
pub use types::{Config, CooldownConfig, ModelConfig, RetryConfig, ServerConfig};
