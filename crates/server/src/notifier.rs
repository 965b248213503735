//! Notification pipeline shared by `/notify` and `/pai`

use std::sync::Arc;

use voice_relay_core::{NotificationRequest, Presenter};
use voice_relay_pipeline::{estimate_cost, SpeechService};

/// Sanitizes a validated request, speaks it and shows a toast
///
/// Speech and toast failures are logged and never reach the caller.
pub struct Notifier {
    speech: SpeechService,
    presenter: Arc<dyn Presenter>,
    default_voice_id: String,
}

impl Notifier {
    pub fn new(speech: SpeechService, presenter: Arc<dyn Presenter>, default_voice_id: String) -> Self {
        Self {
            speech,
            presenter,
            default_voice_id,
        }
    }

    pub fn speech(&self) -> &SpeechService {
        &self.speech
    }

    pub async fn send(&self, request: &NotificationRequest) {
        let title = request.safe_title();
        let message = request.safe_message();

        if request.voice_enabled {
            let voice_id = request.voice_id.as_deref().unwrap_or(&self.default_voice_id);
            if self.speech.has_provider() {
                tracing::info!(
                    voice_id,
                    estimated_credits = estimate_cost(&message),
                    "Generating speech"
                );
            }

            match self.speech.speak(&message, voice_id).await {
                Ok(path) => tracing::debug!(?path, "Speech complete"),
                Err(e) => tracing::error!(error = %e, "Failed to generate or play speech"),
            }
        }

        if let Err(e) = self.presenter.show_notification(&title, &message) {
            tracing::error!(error = %e, "Notification display error");
        }
    }
}
