//! Speech synthesis traits

use async_trait::async_trait;

use crate::error::{PresenterError, ProviderError};
use crate::AudioBuffer;

/// Network text-to-speech provider
///
/// Implementations:
/// - `ElevenLabsProvider` - ElevenLabs REST API
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn SpeechProvider> = Arc::new(ElevenLabsProvider::new(config)?);
/// let audio = provider.synthesize("Build finished", "s3TPKV1kjDlVtZbl4Ksh").await?;
/// ```
#[async_trait]
pub trait SpeechProvider: Send + Sync + 'static {
    /// Synthesize `text` with the given voice
    ///
    /// Implementations may shorten the text before sending it to bound
    /// provider cost.
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<AudioBuffer, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier reported by the health endpoint
    fn model(&self) -> &str;
}

/// OS-native speech synthesizer used as the fallback path
#[async_trait]
pub trait LocalSpeech: Send + Sync + 'static {
    /// Speak `text` aloud, returning once the synthesizer has finished
    async fn speak(&self, text: &str) -> Result<(), PresenterError>;

    /// Name for logging
    fn name(&self) -> &str;
}
