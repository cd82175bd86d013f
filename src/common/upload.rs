use crate::common::response::ApiError;
use crate::infrastructure::storage::JobStorage;
use axum::extract::{Multipart, multipart::Field};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

pub const VIDEO_FIELD: &str = "video";
const DEFAULT_EXTENSION: &str = "mp4";
const MAX_EXTENSION_LEN: usize = 8;

/// A raw upload staged on disk. The file is deleted when the artifact is
/// discarded, or dropped without being discarded.
#[derive(Debug)]
pub struct UploadArtifact {
    pub path: PathBuf,
    pub content_type: String,
    pub size: u64,
    pub original_name: Option<String>,
    removed: bool,
}

impl UploadArtifact {
    fn new(path: PathBuf, content_type: String, original_name: Option<String>) -> Self {
        Self {
            path,
            content_type,
            size: 0,
            original_name,
            removed: false,
        }
    }

    /// File name stem supplied by the client, if any.
    pub fn original_stem(&self) -> Option<&str> {
        self.original_name
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
    }

    pub async fn discard(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for UploadArtifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed upload {} on drop", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

/// Pulls the single `video` file field out of the request and stages it.
/// Other text fields are skipped; any other file field is rejected.
pub async fn receive_video(
    storage: &JobStorage,
    mut multipart: Multipart,
    max_bytes: u64,
) -> Result<UploadArtifact, ApiError> {
    let mut upload: Option<UploadArtifact> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let is_video = field.name() == Some(VIDEO_FIELD);

        if is_video && upload.is_none() {
            upload = Some(stream_to_disk(storage, field, max_bytes).await?);
        } else if is_video || field.file_name().is_some() {
            // Dropping `upload` here removes the file staged so far.
            return Err(ApiError::bad_request("Unexpected field"));
        }
    }

    upload.ok_or(ApiError::MissingFile)
}

/// Streams one multipart field into the staging directory, enforcing the
/// content type and the size cap.
pub async fn stream_to_disk(
    storage: &JobStorage,
    mut field: Field<'_>,
    max_bytes: u64,
) -> Result<UploadArtifact, ApiError> {
    let content_type = field.content_type().unwrap_or_default().to_string();

    if !is_video_type(&content_type) {
        return Err(ApiError::InvalidFileType("Only video files are allowed".to_string()));
    }

    let original_name = field.file_name().map(str::to_owned);
    let extension = pick_extension(original_name.as_deref(), &content_type);
    let mut artifact = UploadArtifact::new(
        storage.new_upload_path(&extension),
        content_type,
        original_name,
    );

    let mut file = File::create(&artifact.path).await?;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                error!("Stream error: {}", e);
                return Err(ApiError::bad_request(e.body_text()));
            }
        };

        artifact.size += chunk.len() as u64;
        if artifact.size > max_bytes {
            return Err(ApiError::bad_request("File too large"));
        }

        file.write_all(&chunk).await?;
    }

    file.flush().await?;

    info!(
        "Stored upload {} ({} bytes, {})",
        artifact.path.display(),
        artifact.size,
        artifact.content_type
    );

    Ok(artifact)
}

fn is_video_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::VIDEO)
        .unwrap_or(false)
}

/// Extension of the client's file name when it looks sane, otherwise one
/// guessed from the content type.
fn pick_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    if let Some(ext) = from_name {
        return ext.to_ascii_lowercase();
    }

    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
