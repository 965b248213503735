//! Error types for the voice relay
//!
//! Only [`ValidationError`] is meant to reach an HTTP caller. Provider and
//! presenter failures are absorbed by the request pipeline and logged.

use thiserror::Error;

/// Result alias using the umbrella [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for the relay
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Presenter(#[from] PresenterError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error was caused by caller input
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Rejected input text
///
/// The `field` names the request field that failed (`title`, `message`,
/// `voice_id`) so the caller sees e.g. `Invalid title: ...`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field}: Invalid input type")]
    TypeMismatch { field: &'static str },

    #[error("Invalid {field}: Message too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid {field}: Invalid characters in input")]
    UnsafeContent { field: &'static str },
}

impl ValidationError {
    /// Field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TypeMismatch { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::UnsafeContent { field } => field,
        }
    }
}

/// Speech synthesis failures from the network provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Speech provider API key not configured")]
    NotConfigured,

    #[error("Speech provider request failed: {0}")]
    Transport(String),

    #[error("Speech provider API error: {status} - {body}")]
    Api { status: u16, body: String },
}

/// Failures from OS playback, local speech or toast display
#[derive(Error, Debug)]
pub enum PresenterError {
    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited with code {code:?}")]
    ExitStatus { program: String, code: Option<i32> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No {0} facility available on this platform")]
    Unsupported(&'static str),
}
