use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    ApiKey,
    FfmpegPath,
    CleanupDelaySecs,
    TmpDir,
    JobsDir,
    MaxUploadMb,
    PublicBaseUrl,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::ApiKey => "SPLITTER_API_KEY",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::CleanupDelaySecs => "CLEANUP_DELAY_SECS",
            EnvKey::TmpDir => "SPLITTER_TMP_DIR",
            EnvKey::JobsDir => "SPLITTER_JOBS_DIR",
            EnvKey::MaxUploadMb => "SPLITTER_MAX_UPLOAD_MB",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
