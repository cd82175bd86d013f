use super::model::{Job, JobResult, JobState, NO_AUDIO_NOTE};
use crate::common::response::ApiError;
use crate::common::upload::UploadArtifact;
use crate::infrastructure::ffmpeg::{TranscodeError, args};
use crate::infrastructure::storage::local::{remove_dir_all, remove_path};
use crate::state::AppState;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SplitError {
    /// `detail` is the diagnostic with server paths replaced.
    #[error("visual extraction failed: {detail}")]
    Visual {
        detail: String,
        #[source]
        source: TranscodeError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::Visual { detail, .. } => ApiError::FfmpegFailed(detail),
            SplitError::Io(e) => ApiError::Io(e),
        }
    }
}

pub struct SplitService;

impl SplitService {
    /// Runs one split job to completion. The staged upload is removed on
    /// every path. Arming the job's cleanup is left to the caller.
    pub async fn split(state: AppState, upload: UploadArtifact) -> Result<JobResult, SplitError> {
        let outcome = Self::run_job(&state, &upload).await;
        upload.discard().await;
        outcome
    }

    async fn run_job(state: &AppState, upload: &UploadArtifact) -> Result<JobResult, SplitError> {
        let job_id = Uuid::new_v4();
        let dir = state.storage.create_job_dir(job_id).await?;
        let mut job = Job::new(job_id, dir, upload.original_stem());

        info!(
            "[split] job {} started ({} bytes, {})",
            job.id, upload.size, upload.content_type
        );

        // 1. Visual: stream copy with audio dropped. Fatal on failure.
        job.advance(JobState::VisualExtracting);
        let visual = args::visual_only(&upload.path, &job.visual_path());
        if let Err(e) = state.ffmpeg.run(&visual).await {
            job.advance(JobState::Failed);
            error!("[split] ffmpeg failed for job {}: {}", job.id, e);

            if let Err(rm) = remove_dir_all(&job.dir).await {
                warn!("[split] could not remove {}: {}", job.dir.display(), rm);
            }
            let detail = redact(
                &e.detail(),
                &[
                    (job.visual_path().as_path(), job.visual_file.as_str()),
                    (job.dir.as_path(), "output"),
                    (upload.path.as_path(), "input"),
                ],
            );
            return Err(SplitError::Visual { detail, source: e });
        }
        job.advance(JobState::VisualDone);

        // 2. Audio proxy: failure only degrades the result.
        job.advance(JobState::AudioExtracting);
        let audio = args::audio_proxy(&upload.path, &job.audio_path());
        match state.ffmpeg.run(&audio).await {
            Ok(()) => {
                job.audio_available = true;
                job.advance(JobState::AudioDone);
            }
            Err(e) => {
                warn!("[split] audio proxy skipped for job {}: {}", job.id, e);
                job.audio_available = false;
                job.note = Some(NO_AUDIO_NOTE.to_string());
                remove_path(&job.audio_path()).await;
                job.advance(JobState::AudioUnavailable);
            }
        }

        job.advance(JobState::Finalized);
        info!(
            "[split] job {} finished (audio available: {})",
            job.id, job.audio_available
        );

        Ok(job.into_result())
    }
}

/// Replaces each server path in `message` with its placeholder. More
/// specific paths must come first.
fn redact(message: &str, paths: &[(&Path, &str)]) -> String {
    paths
        .iter()
        .fold(message.to_string(), |acc, (path, placeholder)| {
            let raw = path.to_string_lossy();
            if raw.is_empty() {
                acc
            } else {
                acc.replace(&*raw, placeholder)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_staging_and_job_paths() {
        let message = "/srv/tmp/1700-42.mp4: Invalid data found when processing input\n\
                       Could not write /srv/jobs/abc/clip-visual-muted.mp4 in /srv/jobs/abc";
        let redacted = redact(
            message,
            &[
                (Path::new("/srv/jobs/abc/clip-visual-muted.mp4"), "clip-visual-muted.mp4"),
                (Path::new("/srv/jobs/abc"), "output"),
                (Path::new("/srv/tmp/1700-42.mp4"), "input"),
            ],
        );

        assert!(redacted.starts_with("input: Invalid data found"));
        assert!(redacted.contains("Could not write clip-visual-muted.mp4 in output"));
        assert!(!redacted.contains("/srv"));
    }

    #[test]
    fn redact_leaves_plain_messages_alone() {
        let redacted = redact("ffmpeg exited with code 1", &[(Path::new("/srv/tmp/x.mp4"), "input")]);
        assert_eq!(redacted, "ffmpeg exited with code 1");
    }
}
