use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use crate::common::naming::safe_base_name;

pub const NO_AUDIO_NOTE: &str = "Input file has no audio track; only visual output generated.";

const VISUAL_SUFFIX: &str = "-visual-muted.mp4";
const AUDIO_SUFFIX: &str = "-audio-black.mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    VisualExtracting,
    VisualDone,
    AudioExtracting,
    AudioDone,
    AudioUnavailable,
    Finalized,
    Failed,
}

/// One split request's unit of work. Owns `dir` exclusively.
#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub dir: PathBuf,
    pub base_name: String,
    pub visual_file: String,
    pub audio_file: String,
    pub audio_available: bool,
    pub note: Option<String>,
    pub state: JobState,
}

impl Job {
    pub fn new(id: Uuid, dir: PathBuf, original_stem: Option<&str>) -> Self {
        let base_name = safe_base_name(original_stem, &format!("job-{}", id));

        Self {
            id,
            dir,
            visual_file: format!("{}{}", base_name, VISUAL_SUFFIX),
            audio_file: format!("{}{}", base_name, AUDIO_SUFFIX),
            base_name,
            audio_available: false,
            note: None,
            state: JobState::Created,
        }
    }

    pub fn visual_path(&self) -> PathBuf {
        self.dir.join(&self.visual_file)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.dir.join(&self.audio_file)
    }

    pub fn advance(&mut self, next: JobState) {
        debug!("Job {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    pub fn into_result(self) -> JobResult {
        JobResult {
            job_id: self.id,
            visual_file: self.visual_file,
            audio_file: self.audio_available.then_some(self.audio_file),
            audio_available: self.audio_available,
            note: self.note,
        }
    }
}

/// Final, immutable outcome of a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job_id: Uuid,
    pub visual_file: String,
    pub audio_file: Option<String>,
    pub audio_available: bool,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_derive_from_sanitized_stem() {
        let id = Uuid::new_v4();
        let job = Job::new(id, PathBuf::from("/jobs/x"), Some("My Clip (final)"));
        assert_eq!(job.base_name, "My_Clip_final");
        assert_eq!(job.visual_file, "My_Clip_final-visual-muted.mp4");
        assert_eq!(job.audio_file, "My_Clip_final-audio-black.mp4");
        assert_eq!(job.visual_path(), PathBuf::from("/jobs/x/My_Clip_final-visual-muted.mp4"));
        assert_eq!(job.state, JobState::Created);
    }

    #[test]
    fn unnamed_uploads_use_job_id() {
        let id = Uuid::new_v4();
        let job = Job::new(id, PathBuf::from("/jobs/x"), None);
        assert_eq!(job.base_name, format!("job-{}", id));
    }

    #[test]
    fn finalize_hides_audio_when_unavailable() {
        let mut job = Job::new(Uuid::new_v4(), PathBuf::from("/jobs/x"), Some("clip"));
        job.note = Some(NO_AUDIO_NOTE.to_string());

        let result = job.into_result();
        assert!(!result.audio_available);
        assert_eq!(result.audio_file, None);
        assert_eq!(result.note.as_deref(), Some(NO_AUDIO_NOTE));
    }

    #[test]
    fn finalize_keeps_audio_when_available() {
        let mut job = Job::new(Uuid::new_v4(), PathBuf::from("/jobs/x"), Some("clip"));
        job.audio_available = true;

        let result = job.into_result();
        assert_eq!(result.audio_file.as_deref(), Some("clip-audio-black.mp4"));
        assert_eq!(result.note, None);
    }
}
