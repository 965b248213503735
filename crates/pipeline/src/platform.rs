//! Host platform detection and OS command execution

use std::process::Stdio;

use tokio::process::Command;
use voice_relay_core::PresenterError;

/// Desktop platforms with a known speech, playback and toast facility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// Name reported by the health endpoint
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Other => "Unknown",
        }
    }
}

/// A program invocation with arguments passed verbatim (no shell)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl OsCommand {
    pub fn new(program: &'static str, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// PowerShell invocation of an inline script
    pub fn powershell(script: impl Into<String>) -> Self {
        Self::new(
            "powershell.exe",
            [
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-Command".to_string(),
                script.into(),
            ],
        )
    }

    /// Run to completion, failing on a non-zero exit
    pub async fn run(&self) -> Result<(), PresenterError> {
        let status = Command::new(self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| PresenterError::Spawn {
                program: self.program.to_string(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PresenterError::ExitStatus {
                program: self.program.to_string(),
                code: status.code(),
            })
        }
    }
}

/// Run the first candidate whose program can be spawned
///
/// A candidate that is missing from the system is skipped. A candidate that
/// starts but fails ends the search with its error.
pub async fn run_first_available(
    candidates: &[OsCommand],
    facility: &'static str,
) -> Result<(), PresenterError> {
    let mut last_error = None;

    for candidate in candidates {
        match candidate.run().await {
            Ok(()) => return Ok(()),
            Err(e @ PresenterError::Spawn { .. }) => {
                tracing::debug!(program = candidate.program, error = %e, "Trying next {}", facility);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(PresenterError::Unsupported(facility)))
}

/// Quote a value for a single-quoted PowerShell string
pub(crate) fn ps_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Escape a value for a double-quoted AppleScript string
pub(crate) fn applescript_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
