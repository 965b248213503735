//! Speech and presentation pipeline
//!
//! Features:
//! - ElevenLabs synthesis with cost-bounded text shortening
//! - OS speech fallback (`say`, System.Speech, `spd-say`/`espeak-ng`)
//! - Transient-file audio playback
//! - Detached desktop toasts

pub mod platform;
pub mod presenter;
pub mod tts;

pub use platform::{OsCommand, Platform};
pub use presenter::{SystemPresenter, ToastReport};
pub use tts::{
    estimate_cost, ElevenLabsConfig, ElevenLabsProvider, SpeechPath, SpeechService, SystemSpeech,
    TextBudget,
};

use thiserror::Error;

/// Pipeline construction errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<PipelineError> for voice_relay_core::Error {
    fn from(err: PipelineError) -> Self {
        voice_relay_core::Error::Internal(err.to_string())
    }
}
