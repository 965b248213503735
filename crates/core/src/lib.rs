//! Core traits and types for the voice relay
//!
//! This crate provides the types shared by every other crate:
//! - Capability traits for speech providers, local speech and presenters
//! - Input validation and sanitization
//! - Notification request/outcome types
//! - Error types

pub mod audio;
pub mod error;
pub mod notification;
pub mod traits;
pub mod validation;

pub use audio::{AudioBuffer, AudioEncoding};
pub use error::{Error, PresenterError, ProviderError, Result, ValidationError};
pub use notification::{
    is_truthy, BodyDefaults, BodyPolicy, NotificationOutcome, NotificationRequest, OutcomeStatus,
};
pub use traits::{LocalSpeech, Presenter, SpeechProvider};
pub use validation::{sanitize, validate, validate_str, MAX_TEXT_LENGTH};
