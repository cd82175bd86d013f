use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// On-disk layout: raw uploads are staged in `tmp_dir`, each job gets
/// `jobs_dir/<job_id>/`.
#[derive(Clone, Debug)]
pub struct JobStorage {
    pub tmp_dir: PathBuf,
    pub jobs_dir: PathBuf,
}

/// A job directory found at startup that is still inside its retention window.
#[derive(Debug)]
pub struct SurvivingJob {
    pub label: String,
    pub dir: PathBuf,
    pub remaining: Duration,
}

impl JobStorage {
    pub fn new(tmp_dir: impl Into<PathBuf>, jobs_dir: impl Into<PathBuf>) -> Self {
        Self {
            tmp_dir: tmp_dir.into(),
            jobs_dir: jobs_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.tmp_dir).await?;
        fs::create_dir_all(&self.jobs_dir).await?;
        info!(
            "✅ Storage ready (uploads: {}, jobs: {})",
            self.tmp_dir.display(),
            self.jobs_dir.display()
        );
        Ok(())
    }

    /// Unique staging path for a raw upload: `<unix_millis>-<random>.<ext>`.
    pub fn new_upload_path(&self, extension: &str) -> PathBuf {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let nonce: u32 = rand::random_range(0..1_000_000_000);
        self.tmp_dir.join(format!("{}-{}.{}", millis, nonce, extension))
    }

    pub fn job_dir(&self, job_id: Uuid) -> PathBuf {
        self.jobs_dir.join(job_id.to_string())
    }

    pub async fn create_job_dir(&self, job_id: Uuid) -> io::Result<PathBuf> {
        let dir = self.job_dir(job_id);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Startup reconciliation. Staged uploads are always stale after a restart.
    /// Job directories past `retention` are deleted; the rest are returned so
    /// their cleanup can be re-armed.
    pub async fn reconcile(&self, retention: Duration) -> io::Result<Vec<SurvivingJob>> {
        let mut entries = fs::read_dir(&self.tmp_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            remove_path(&entry.path()).await;
        }

        let now = OffsetDateTime::now_utc();
        let mut surviving = Vec::new();
        let mut expired = 0usize;

        let mut entries = fs::read_dir(&self.jobs_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }

            let age: Duration = metadata
                .modified()
                .map(|modified| now - OffsetDateTime::from(modified))
                .ok()
                .and_then(|age| Duration::try_from(age).ok())
                .unwrap_or_default();

            if age >= retention {
                remove_dir(&entry.path()).await;
                expired += 1;
            } else {
                surviving.push(SurvivingJob {
                    label: entry.file_name().to_string_lossy().into_owned(),
                    dir: entry.path(),
                    remaining: retention - age,
                });
            }
        }

        info!(
            "Reconciled job storage: {} expired, {} re-armed",
            expired,
            surviving.len()
        );
        Ok(surviving)
    }
}

/// Deletes a file, ignoring a missing path and logging anything else.
pub async fn remove_path(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

/// Recursively deletes a directory. A missing directory is not an error.
pub async fn remove_dir_all(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

async fn remove_dir(dir: &Path) {
    if let Err(e) = remove_dir_all(dir).await {
        warn!("Failed to remove {}: {}", dir.display(), e);
    }
}
