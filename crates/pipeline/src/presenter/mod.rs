//! OS presenter: audio playback and desktop toasts

pub mod playback;
pub mod toast;

pub use playback::playback_commands;
pub use toast::{toast_commands, ToastReport, WINDOWS_APP_ID};

use async_trait::async_trait;
use tokio::sync::mpsc;
use voice_relay_core::{AudioBuffer, Presenter, PresenterError};

use crate::platform::{run_first_available, Platform};

/// Presenter backed by the host's player and notification commands
///
/// Toasts run as detached tasks. Their outcome is sent over a channel whose
/// receiver only logs.
#[derive(Debug, Clone)]
pub struct SystemPresenter {
    platform: Platform,
    reports: mpsc::UnboundedSender<ToastReport>,
}

impl SystemPresenter {
    /// Create a presenter and spawn its report drain
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(platform: Platform) -> Self {
        let (reports, rx) = mpsc::unbounded_channel();
        tokio::spawn(drain_reports(rx));
        Self { platform, reports }
    }
}

async fn drain_reports(mut rx: mpsc::UnboundedReceiver<ToastReport>) {
    while let Some(report) = rx.recv().await {
        match report.result {
            Ok(()) => tracing::debug!(title = %report.title, "Notification displayed"),
            Err(e) => tracing::warn!(title = %report.title, error = %e, "Notification display failed"),
        }
    }
}

#[async_trait]
impl Presenter for SystemPresenter {
    async fn play_audio(&self, audio: &AudioBuffer) -> Result<(), PresenterError> {
        playback::play(self.platform, audio).await
    }

    fn show_notification(&self, title: &str, message: &str) -> Result<(), PresenterError> {
        let commands = toast_commands(self.platform, title, message);
        if commands.is_empty() {
            return Err(PresenterError::Unsupported("toast"));
        }

        let reports = self.reports.clone();
        let title = title.to_string();
        tokio::spawn(async move {
            let result = run_first_available(&commands, "toast").await;
            // Receiver gone means the server is shutting down
            let _ = reports.send(ToastReport { title, result });
        });

        Ok(())
    }
}
