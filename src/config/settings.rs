use std::path::PathBuf;
use std::time::Duration;

use crate::config::env::{self, EnvKey};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_KEY: &str = "change-me";
pub const DEFAULT_CLEANUP_DELAY_SECS: u64 = 30 * 60;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 800;

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    /// `None` disables the API-key gate.
    pub api_key: Option<String>,
    pub ffmpeg_path: PathBuf,
    /// How long a job's outputs stay downloadable.
    pub cleanup_delay: Duration,
    pub tmp_dir: PathBuf,
    pub jobs_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub public_base_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // An explicitly empty key turns the gate off; an unset one keeps the default.
        let api_key = Some(env::get_or(EnvKey::ApiKey, DEFAULT_API_KEY)).filter(|k| !k.is_empty());

        let public_base_url = env::get(EnvKey::PublicBaseUrl)
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, DEFAULT_PORT),
            api_key,
            ffmpeg_path: PathBuf::from(env::get_or(EnvKey::FfmpegPath, "ffmpeg")),
            cleanup_delay: Duration::from_secs(env::get_parsed(
                EnvKey::CleanupDelaySecs,
                DEFAULT_CLEANUP_DELAY_SECS,
            )),
            tmp_dir: PathBuf::from(env::get_or(EnvKey::TmpDir, "tmp")),
            jobs_dir: PathBuf::from(env::get_or(EnvKey::JobsDir, "jobs")),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadMb, DEFAULT_MAX_UPLOAD_MB) * 1024 * 1024,
            public_base_url,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
