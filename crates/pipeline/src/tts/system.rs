//! OS-native speech synthesis
//!
//! Used when no provider credential is configured and as the fallback when
//! the provider or playback fails.

use async_trait::async_trait;
use voice_relay_core::{LocalSpeech, PresenterError};

use crate::platform::{ps_single_quote, run_first_available, OsCommand, Platform};

/// Speaks through the host's built-in synthesizer
#[derive(Debug, Clone, Copy)]
pub struct SystemSpeech {
    platform: Platform,
}

impl SystemSpeech {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for SystemSpeech {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

/// Candidate synthesizer commands for `platform`, in preference order
pub fn speech_commands(platform: Platform, text: &str) -> Vec<OsCommand> {
    match platform {
        Platform::MacOs => vec![OsCommand::new("say", ["--", text])],
        Platform::Windows => vec![OsCommand::powershell(windows_speech_script(text))],
        Platform::Linux => vec![
            OsCommand::new("spd-say", ["--wait", "--", text]),
            OsCommand::new("espeak-ng", ["--", text]),
        ],
        Platform::Other => Vec::new(),
    }
}

// Prefers an installed en-GB voice and falls back to the system default.
fn windows_speech_script(text: &str) -> String {
    format!(
        "Add-Type -AssemblyName System.Speech; \
         $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
         $uk = $synth.GetInstalledVoices() | Where-Object {{ $_.VoiceInfo.Culture.Name -like 'en-GB*' }} | Select-Object -First 1; \
         if ($uk) {{ $synth.SelectVoice($uk.VoiceInfo.Name) }}; \
         $synth.Speak({})",
        ps_single_quote(text)
    )
}

#[async_trait]
impl LocalSpeech for SystemSpeech {
    async fn speak(&self, text: &str) -> Result<(), PresenterError> {
        tracing::debug!(
            platform = self.platform.display_name(),
            chars = text.chars().count(),
            "Speaking with system synthesizer"
        );
        run_first_available(&speech_commands(self.platform, text), "speech").await
    }

    fn name(&self) -> &str {
        "system"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_uses_say() {
        let commands = speech_commands(Platform::MacOs, "Build done");
        assert_eq!(commands, vec![OsCommand::new("say", ["--", "Build done"])]);
    }

    #[test]
    fn test_linux_prefers_speech_dispatcher() {
        let commands = speech_commands(Platform::Linux, "Build done");
        let programs: Vec<_> = commands.iter().map(|c| c.program).collect();
        assert_eq!(programs, vec!["spd-say", "espeak-ng"]);
        assert_eq!(commands[0].args, vec!["--wait", "--", "Build done"]);
    }

    #[test]
    fn test_leading_dash_text_is_not_an_option() {
        for platform in [Platform::MacOs, Platform::Linux] {
            for command in speech_commands(platform, "-w.env") {
                let pos = command.args.iter().position(|a| a == "-w.env").unwrap();
                assert!(pos > 0, "{} got text as first argument", command.program);
                assert_eq!(command.args[pos - 1], "--", "{}", command.program);
            }
        }
    }

    #[test]
    fn test_windows_script_quotes_text() {
        let commands = speech_commands(Platform::Windows, "It's done");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program, "powershell.exe");
        let script = commands[0].args.last().unwrap();
        assert!(script.contains("System.Speech"));
        assert!(script.contains("en-GB*"));
        assert!(script.ends_with("$synth.Speak('It''s done')"));
    }

    #[tokio::test]
    async fn test_unknown_platform_is_unsupported() {
        let speech = SystemSpeech::new(Platform::Other);
        let err = speech.speak("hello").await.unwrap_err();
        assert!(matches!(err, PresenterError::Unsupported("speech")));
    }
}
