//! Capability traits for the relay's external collaborators
//!
//! Every side effect the relay performs goes through one of these traits so
//! that the request pipeline can be exercised with recording fakes.
//!
//! ```text
//! Speech:
//!   - SpeechProvider: Text → Audio via a network service
//!   - LocalSpeech:    Text → spoken output via the OS synthesizer
//!
//! Presentation:
//!   - Presenter: Audio playback and desktop toasts
//! ```

mod presenter;
mod speech;

pub use presenter::Presenter;
pub use speech::{LocalSpeech, SpeechProvider};
