//! Configuration management for the voice relay
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (`VOICE_RELAY__` prefix)
//! - A `.env` file in the user's home directory or `$PAI_DIR`
//! - Legacy variables (`PORT`, `ELEVENLABS_API_KEY`, `ELEVENLABS_VOICE_ID`)

pub mod constants;
pub mod dotenv;
pub mod settings;

pub use dotenv::{discover_env_file, load_dotenv};
pub use settings::{
    load_settings, settings_or_default, ObservabilityConfig, RateLimitConfig, RuntimeEnvironment,
    ServerConfig, Settings, TruncationConfig, VoiceConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(path) => ConfigError::FileNotFound(path),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}
