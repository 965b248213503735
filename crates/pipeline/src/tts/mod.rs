//! Speech synthesis
//!
//! [`SpeechService`] composes the network provider, audio playback and the
//! OS synthesizer into a single `speak` call.

pub mod budget;
pub mod elevenlabs;
pub mod system;

pub use budget::{estimate_cost, TextBudget};
pub use elevenlabs::{ElevenLabsConfig, ElevenLabsProvider};
pub use system::{speech_commands, SystemSpeech};

use std::sync::Arc;
use std::time::Instant;

use voice_relay_core::{LocalSpeech, Presenter, PresenterError, SpeechProvider};

/// Which path ended up speaking a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechPath {
    /// Provider audio was synthesized and played
    Provider,
    /// The OS synthesizer spoke the text
    Local,
}

/// Provider speech with a local fallback
pub struct SpeechService {
    provider: Option<Arc<dyn SpeechProvider>>,
    local: Arc<dyn LocalSpeech>,
    presenter: Arc<dyn Presenter>,
}

impl SpeechService {
    /// `provider` is `None` when no credential is configured
    pub fn new(
        provider: Option<Arc<dyn SpeechProvider>>,
        local: Arc<dyn LocalSpeech>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            provider,
            local,
            presenter,
        }
    }

    /// Whether a network provider is configured
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Model of the configured provider, if any
    pub fn provider_model(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.model())
    }

    /// Speak `text`
    ///
    /// With a provider: synthesize, then play. If either step fails the
    /// local synthesizer is used once; the provider is never retried.
    /// Without a provider the local synthesizer is used directly.
    pub async fn speak(&self, text: &str, voice_id: &str) -> Result<SpeechPath, PresenterError> {
        let Some(provider) = self.provider.as_deref() else {
            self.speak_locally(text).await?;
            return Ok(SpeechPath::Local);
        };

        let start = Instant::now();
        match self.speak_with_provider(provider, text, voice_id).await {
            Ok(()) => {
                metrics::histogram!("speech_latency_ms", "path" => "provider")
                    .record(start.elapsed().as_secs_f64() * 1000.0);
                Ok(SpeechPath::Provider)
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Provider speech failed, falling back to {}",
                    self.local.name()
                );
                metrics::counter!("speech_fallback_total").increment(1);
                self.speak_locally(text).await?;
                Ok(SpeechPath::Local)
            }
        }
    }

    async fn speak_with_provider(
        &self,
        provider: &dyn SpeechProvider,
        text: &str,
        voice_id: &str,
    ) -> Result<(), voice_relay_core::Error> {
        let audio = provider.synthesize(text, voice_id).await?;
        self.presenter.play_audio(&audio).await?;
        Ok(())
    }

    async fn speak_locally(&self, text: &str) -> Result<(), PresenterError> {
        let start = Instant::now();
        self.local.speak(text).await?;
        metrics::histogram!("speech_latency_ms", "path" => "local")
            .record(start.elapsed().as_secs_f64() * 1000.0);
        Ok(())
    }
}
