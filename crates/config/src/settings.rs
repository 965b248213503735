//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{elevenlabs, rate_limit, server as server_defaults, truncation};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech provider configuration
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_voice()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        let rate_limit = &server.rate_limit;
        if rate_limit.enabled {
            if rate_limit.max_requests == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.max_requests".to_string(),
                    message: "Must be at least 1 when rate limiting is enabled".to_string(),
                });
            }

            if rate_limit.window_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.window_ms".to_string(),
                    message: "Window must be at least 1ms".to_string(),
                });
            }

            if rate_limit.sweep_interval_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.sweep_interval_secs".to_string(),
                    message: "Sweep interval must be at least 1 second".to_string(),
                });
            }
        }

        if server.host != server_defaults::DEFAULT_HOST && server.host != "localhost" {
            tracing::warn!(
                host = %server.host,
                "Relay is bound to a non-loopback address; any host on the network can trigger notifications"
            );
        }

        Ok(())
    }

    fn validate_voice(&self) -> Result<(), ConfigError> {
        let voice = &self.voice;

        if !(0.0..=1.0).contains(&voice.stability) {
            return Err(ConfigError::InvalidValue {
                field: "voice.stability".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", voice.stability),
            });
        }

        if !(0.0..=1.0).contains(&voice.similarity_boost) {
            return Err(ConfigError::InvalidValue {
                field: "voice.similarity_boost".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", voice.similarity_boost),
            });
        }

        let t = &voice.truncation;
        if !(t.factor > 0.0 && t.factor <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "voice.truncation.factor".to_string(),
                message: format!("Must be in (0.0, 1.0], got {}", t.factor),
            });
        }

        if t.min_chars > t.max_chars {
            return Err(ConfigError::InvalidValue {
                field: "voice.truncation.min_chars".to_string(),
                message: format!(
                    "Cannot be larger than max_chars ({} > {})",
                    t.min_chars, t.max_chars
                ),
            });
        }

        if voice.default_voice_id.trim().is_empty() {
            return Err(ConfigError::MissingField("voice.default_voice_id".to_string()));
        }

        if voice.api_key().is_none() {
            if self.environment.is_production() {
                return Err(ConfigError::MissingField("voice.api_key".to_string()));
            }
            tracing::warn!(
                "{} not configured; notifications will use the local speech synthesizer",
                elevenlabs::API_KEY_ENV
            );
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Value of `Access-Control-Allow-Origin` on every response
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    server_defaults::DEFAULT_HOST.to_string()
}

/// `PORT` is honoured for compatibility with existing hook scripts
fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(server_defaults::DEFAULT_PORT)
}

fn default_cors_origin() -> String {
    server_defaults::CORS_ORIGIN.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Fixed-window rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests allowed per identity per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Interval between evictions of expired identities
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Header the client identity is read from
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Identity shared by every caller without the header
    #[serde(default = "default_fallback_identity")]
    pub fallback_identity: String,
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u32 {
    rate_limit::MAX_REQUESTS
}

fn default_window_ms() -> u64 {
    rate_limit::WINDOW_MS
}

fn default_sweep_interval_secs() -> u64 {
    rate_limit::SWEEP_INTERVAL_SECS
}

fn default_identity_header() -> String {
    rate_limit::IDENTITY_HEADER.to_string()
}

fn default_fallback_identity() -> String {
    rate_limit::FALLBACK_IDENTITY.to_string()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            identity_header: default_identity_header(),
            fallback_identity: default_fallback_identity(),
        }
    }
}

/// Speech provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// ElevenLabs API key (falls back to `ELEVENLABS_API_KEY`)
    #[serde(default = "default_api_key", skip_serializing)]
    pub api_key: Option<String>,

    /// Voice used when a request does not name one
    #[serde(default = "default_voice_id")]
    pub default_voice_id: String,

    /// ElevenLabs model
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_stability")]
    pub stability: f32,

    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,

    /// Shortening applied before text is sent to the provider
    #[serde(default)]
    pub truncation: TruncationConfig,
}

impl VoiceConfig {
    /// The API key, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn default_api_key() -> Option<String> {
    std::env::var(elevenlabs::API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn default_voice_id() -> String {
    std::env::var(elevenlabs::VOICE_ID_ENV)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| elevenlabs::DEFAULT_VOICE_ID.to_string())
}

fn default_model_id() -> String {
    elevenlabs::MODEL_ID.to_string()
}

fn default_api_base_url() -> String {
    elevenlabs::API_BASE_URL.to_string()
}

fn default_stability() -> f32 {
    elevenlabs::STABILITY
}

fn default_similarity_boost() -> f32 {
    elevenlabs::SIMILARITY_BOOST
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            default_voice_id: default_voice_id(),
            model_id: default_model_id(),
            api_base_url: default_api_base_url(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            truncation: TruncationConfig::default(),
        }
    }
}

/// `max_len = clamp(floor(len * factor), min_chars, max_chars)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncationConfig {
    #[serde(default = "default_truncation_factor")]
    pub factor: f64,

    #[serde(default = "default_truncation_min")]
    pub min_chars: usize,

    #[serde(default = "default_truncation_max")]
    pub max_chars: usize,
}

fn default_truncation_factor() -> f64 {
    truncation::FACTOR
}

fn default_truncation_min() -> usize {
    truncation::MIN_CHARS
}

fn default_truncation_max() -> usize {
    truncation::MAX_CHARS
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            factor: default_truncation_factor(),
            min_chars: default_truncation_min(),
            max_chars: default_truncation_max(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics on a separate port
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Metrics port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (VOICE_RELAY__ prefix, `__` separated)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
/// 4. Compiled defaults, which read `PORT`, `ELEVENLABS_API_KEY` and
///    `ELEVENLABS_VOICE_ID`
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOICE_RELAY")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

/// Fall back to compiled defaults only when no configuration file exists
///
/// Parse and validation failures are returned so a broken or incomplete
/// deployment refuses to start.
pub fn settings_or_default(
    loaded: Result<Settings, ConfigError>,
) -> Result<Settings, ConfigError> {
    match loaded {
        Err(ConfigError::FileNotFound(_)) => Ok(Settings::default()),
        other => other,
    }
}
