//! Audible and visible output

use async_trait::async_trait;

use crate::error::PresenterError;
use crate::AudioBuffer;

/// Makes a notification audible and visible to the user
///
/// Both operations are best-effort. Callers log failures and carry on.
#[async_trait]
pub trait Presenter: Send + Sync + 'static {
    /// Play `audio`, returning once playback has completed
    async fn play_audio(&self, audio: &AudioBuffer) -> Result<(), PresenterError>;

    /// Display a toast without waiting for it
    ///
    /// `Ok` means the display was scheduled, not that it was shown.
    /// Both strings must already be sanitized.
    fn show_notification(&self, title: &str, message: &str) -> Result<(), PresenterError>;
}
