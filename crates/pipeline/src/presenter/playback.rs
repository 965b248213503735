//! Audio playback through the OS player

use std::io::Write;
use std::path::Path;

use voice_relay_core::{AudioBuffer, AudioEncoding, PresenterError};

use crate::platform::{ps_single_quote, run_first_available, OsCommand, Platform};

/// Candidate player commands for `path`, in preference order
pub fn playback_commands(platform: Platform, path: &Path, encoding: AudioEncoding) -> Vec<OsCommand> {
    let file = path.to_string_lossy().into_owned();
    match platform {
        Platform::MacOs => vec![OsCommand::new("afplay", [file])],
        Platform::Windows => vec![OsCommand::powershell(windows_playback_script(&file, encoding))],
        Platform::Linux => vec![
            OsCommand::new("mpg123", ["-q".to_string(), file.clone()]),
            OsCommand::new(
                "ffplay",
                [
                    "-nodisp".to_string(),
                    "-autoexit".to_string(),
                    "-loglevel".to_string(),
                    "quiet".to_string(),
                    file,
                ],
            ),
        ],
        Platform::Other => Vec::new(),
    }
}

/// Polls (50 ms each) allowed for MediaPlayer to learn the track duration
const WINDOWS_OPEN_POLLS: u32 = 100;

// SoundPlayer only understands WAV. MP3 goes through MediaPlayer, which
// plays asynchronously, so the script waits for the natural duration.
// A file MediaPlayer cannot open never gets one; exit non-zero instead.
fn windows_playback_script(file: &str, encoding: AudioEncoding) -> String {
    match encoding {
        AudioEncoding::Wav => format!(
            "(New-Object Media.SoundPlayer {}).PlaySync()",
            ps_single_quote(file)
        ),
        AudioEncoding::Mp3 => format!(
            "Add-Type -AssemblyName PresentationCore; \
             $player = New-Object System.Windows.Media.MediaPlayer; \
             $player.Open([uri]{}); \
             $polls = 0; \
             while (-not $player.NaturalDuration.HasTimeSpan) {{ \
             if ($polls -ge {}) {{ $player.Close(); exit 1 }}; \
             Start-Sleep -Milliseconds 50; $polls++ }}; \
             $player.Play(); \
             Start-Sleep -Milliseconds ([int]$player.NaturalDuration.TimeSpan.TotalMilliseconds + 200); \
             $player.Close()",
            ps_single_quote(file),
            WINDOWS_OPEN_POLLS
        ),
    }
}

/// Write `audio` to a transient file, play it, then remove the file
///
/// Removal failures are logged and never returned.
pub async fn play(platform: Platform, audio: &AudioBuffer) -> Result<(), PresenterError> {
    let path = {
        let mut file = tempfile::Builder::new()
            .prefix("voice-")
            .suffix(&format!(".{}", audio.encoding.extension()))
            .tempfile()?;
        file.write_all(&audio.data)?;
        file.flush()?;
        file.into_temp_path()
    };

    tracing::debug!(
        path = %path.display(),
        bytes = audio.len(),
        "Playing synthesized audio"
    );
    let result =
        run_first_available(&playback_commands(platform, &path, audio.encoding), "playback").await;

    let shown = path.display().to_string();
    if let Err(e) = path.close() {
        tracing::warn!(path = %shown, error = %e, "Failed to delete temporary audio file");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_macos_uses_afplay() {
        let path = PathBuf::from("/tmp/voice-1.mp3");
        let commands = playback_commands(Platform::MacOs, &path, AudioEncoding::Mp3);
        assert_eq!(commands, vec![OsCommand::new("afplay", ["/tmp/voice-1.mp3"])]);
    }

    #[test]
    fn test_linux_falls_back_to_ffplay() {
        let path = PathBuf::from("/tmp/voice-1.mp3");
        let commands = playback_commands(Platform::Linux, &path, AudioEncoding::Mp3);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program, "mpg123");
        assert_eq!(commands[1].program, "ffplay");
        assert!(commands[1].args.contains(&"-autoexit".to_string()));
        assert_eq!(commands[1].args.last().unwrap(), "/tmp/voice-1.mp3");
    }

    #[test]
    fn test_windows_script_by_encoding() {
        let path = PathBuf::from("C:\\Temp\\voice-1.wav");
        let wav = playback_commands(Platform::Windows, &path, AudioEncoding::Wav);
        assert!(wav[0].args.last().unwrap().contains("Media.SoundPlayer"));

        let mp3 = playback_commands(Platform::Windows, &path, AudioEncoding::Mp3);
        assert!(mp3[0].args.last().unwrap().contains("MediaPlayer"));
        assert!(!mp3[0].args.last().unwrap().contains("SoundPlayer"));
    }

    #[test]
    fn test_windows_mp3_wait_is_bounded() {
        let path = PathBuf::from("C:\\Temp\\voice-1.mp3");
        let mp3 = playback_commands(Platform::Windows, &path, AudioEncoding::Mp3);
        let script = mp3[0].args.last().unwrap();
        assert!(script.contains("if ($polls -ge 100) { $player.Close(); exit 1 }"));
        assert!(script.contains("$polls++"));
        assert!(script.find("exit 1").unwrap() < script.find("$player.Play()").unwrap());
    }

    #[tokio::test]
    async fn test_temp_file_removed_after_failed_playback() {
        let before: Vec<_> = voice_files();
        let err = play(Platform::Other, &AudioBuffer::mp3(vec![0u8; 16]))
            .await
            .unwrap_err();
        assert!(matches!(err, PresenterError::Unsupported("playback")));
        let after: Vec<_> = voice_files();
        assert!(after.iter().all(|p| before.contains(p)));
    }

    fn voice_files() -> Vec<PathBuf> {
        std::fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .map(|n| n.starts_with("voice-") && n.ends_with(".mp3"))
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
