//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use parking_lot::RwLock;

use voice_relay_config::Settings;
use voice_relay_core::{LocalSpeech, Presenter, SpeechProvider};
use voice_relay_pipeline::{
    ElevenLabsConfig, ElevenLabsProvider, Platform, SpeechService, SystemPresenter, SystemSpeech,
};

use crate::notifier::Notifier;
use crate::rate_limit::RateLimiter;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Settings>>,
    /// Per-client request counters
    pub rate_limiter: Arc<RateLimiter>,
    /// Validation, speech and toast pipeline
    pub notifier: Arc<Notifier>,
    /// Host platform reported by `/health`
    pub platform: Platform,
}

impl AppState {
    /// Create state with the OS speech, playback and toast backends
    ///
    /// The ElevenLabs provider is used when an API key is configured.
    /// Must be called from within a tokio runtime.
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let platform = Platform::current();

        let provider: Option<Arc<dyn SpeechProvider>> =
            match ElevenLabsConfig::from_settings(&config.voice) {
                Some(elevenlabs) => Some(Arc::new(
                    ElevenLabsProvider::new(elevenlabs).map_err(voice_relay_core::Error::from)?,
                )),
                None => None,
            };

        Ok(Self::with_backends(
            config,
            platform,
            provider,
            Arc::new(SystemSpeech::new(platform)),
            Arc::new(SystemPresenter::new(platform)),
        ))
    }

    /// Create state with explicit backends
    pub fn with_backends(
        config: Settings,
        platform: Platform,
        provider: Option<Arc<dyn SpeechProvider>>,
        local: Arc<dyn LocalSpeech>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::from_config(&config.server.rate_limit));
        let speech = SpeechService::new(provider, local, presenter.clone());
        let notifier = Notifier::new(speech, presenter, config.voice.default_voice_id.clone());

        Self {
            config: Arc::new(RwLock::new(config)),
            rate_limiter,
            notifier: Arc::new(notifier),
            platform,
        }
    }

    /// Get a read guard to the current configuration
    pub fn get_config(&self) -> parking_lot::RwLockReadGuard<'_, Settings> {
        self.config.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_provider_url_is_internal_error() {
        let mut config = Settings::default();
        config.voice.api_key = Some("sk-test".to_string());
        config.voice.api_base_url = "ftp://api.elevenlabs.io".to_string();

        let err = AppState::new(config).err().unwrap();
        assert!(matches!(err, ServerError::Internal(detail) if detail.contains("ftp://")));
    }

    #[tokio::test]
    async fn test_no_api_key_builds_local_only_state() {
        let mut config = Settings::default();
        config.voice.api_key = None;
        assert!(AppState::new(config).is_ok());
    }
}
