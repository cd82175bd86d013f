//! Runs the ffmpeg binary as a child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Result of one transcoder invocation.
pub type TranscodeOutcome = Result<(), TranscodeError>;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to launch ffmpeg: {0}")]
    LaunchFailed(#[source] std::io::Error),

    #[error("{message}")]
    Failed {
        message: String,
        exit_code: Option<i32>,
    },
}

impl TranscodeError {
    /// Diagnostic text suitable for the client-facing `detail` field.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Ffmpeg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Runs the binary to completion. Stdout is discarded and stderr is kept
    /// for diagnostics. Only exit code 0 counts as success.
    pub async fn run(&self, args: &[String]) -> TranscodeOutcome {
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(TranscodeError::LaunchFailed)?;

        if output.status.success() {
            return Ok(());
        }

        let exit_code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if !stderr.is_empty() {
            stderr
        } else {
            match exit_code {
                Some(code) => format!("ffmpeg exited with code {}", code),
                None => "ffmpeg terminated by signal".to_string(),
            }
        };

        Err(TranscodeError::Failed { message, exit_code })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        let sh = Ffmpeg::new("/bin/sh");
        assert!(sh.run(&shell("echo noise; exit 0")).await.is_ok());
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let sh = Ffmpeg::new("/bin/sh");
        let err = sh
            .run(&shell("echo 'Output file #0 does not contain any stream' >&2; exit 1"))
            .await
            .unwrap_err();

        match err {
            TranscodeError::Failed { message, exit_code } => {
                assert_eq!(message, "Output file #0 does not contain any stream");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_failure_mentions_exit_code() {
        let sh = Ffmpeg::new("/bin/sh");
        let err = sh.run(&shell("echo only-stdout; exit 3")).await.unwrap_err();
        assert_eq!(err.detail(), "ffmpeg exited with code 3");
    }

    #[tokio::test]
    async fn missing_binary_is_launch_failure() {
        let missing = Ffmpeg::new("/nonexistent/definitely-not-ffmpeg");
        let err = missing.run(&[]).await.unwrap_err();
        assert!(matches!(err, TranscodeError::LaunchFailed(_)));
        assert!(err.detail().starts_with("failed to launch ffmpeg"));
    }
}
