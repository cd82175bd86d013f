use serde::Serialize;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::JobResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub ffmpeg: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            ffmpeg: "required on PATH".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Downloads {
    pub visual: String,
    /// `null` when the input had no usable audio track.
    pub audio: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitResponse {
    pub status: String,
    pub job_id: Uuid,
    pub downloads: Downloads,
    pub audio_available: bool,
    pub note: Option<String>,
}

impl SplitResponse {
    pub fn build(result: &JobResult, base_url: &Url) -> Self {
        let job_id = result.job_id.to_string();

        Self {
            status: "ok".to_string(),
            job_id: result.job_id,
            downloads: Downloads {
                visual: download_url(base_url, &job_id, &result.visual_file),
                audio: result
                    .audio_file
                    .as_deref()
                    .filter(|_| result.audio_available)
                    .map(|file| download_url(base_url, &job_id, file)),
            },
            audio_available: result.audio_available,
            note: result.note.clone(),
        }
    }
}

/// `<base>/jobs/<job_id>/<file>`, keeping any path prefix already on `base`.
pub fn download_url(base: &Url, job_id: &str, file_name: &str) -> String {
    let mut url = base.clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(["jobs", job_id, file_name]);
        }
        Err(()) => {
            return format!(
                "{}/jobs/{}/{}",
                base.as_str().trim_end_matches('/'),
                job_id,
                file_name
            );
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::split::model::NO_AUDIO_NOTE;

    fn result(audio: bool) -> JobResult {
        JobResult {
            job_id: Uuid::parse_str("7d3c2a8e-0c8b-4a4e-9a59-2f7c0d7d2b11").unwrap(),
            visual_file: "clip-visual-muted.mp4".into(),
            audio_file: audio.then(|| "clip-audio-black.mp4".into()),
            audio_available: audio,
            note: (!audio).then(|| NO_AUDIO_NOTE.into()),
        }
    }

    #[test]
    fn builds_both_urls_when_audio_exists() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let json = serde_json::to_value(SplitResponse::build(&result(true), &base)).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["jobId"], "7d3c2a8e-0c8b-4a4e-9a59-2f7c0d7d2b11");
        assert_eq!(
            json["downloads"]["visual"],
            "http://localhost:8080/jobs/7d3c2a8e-0c8b-4a4e-9a59-2f7c0d7d2b11/clip-visual-muted.mp4"
        );
        assert_eq!(
            json["downloads"]["audio"],
            "http://localhost:8080/jobs/7d3c2a8e-0c8b-4a4e-9a59-2f7c0d7d2b11/clip-audio-black.mp4"
        );
        assert_eq!(json["audioAvailable"], true);
        assert!(json["note"].is_null());
    }

    #[test]
    fn audio_is_null_without_audio_track() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let json = serde_json::to_value(SplitResponse::build(&result(false), &base)).unwrap();

        assert!(json["downloads"]["audio"].is_null());
        assert_eq!(json["audioAvailable"], false);
        assert_eq!(json["note"], NO_AUDIO_NOTE);
    }

    #[test]
    fn keeps_base_path_prefix() {
        let base = Url::parse("https://media.example.com/splitter/").unwrap();
        assert_eq!(
            download_url(&base, "abc", "x-visual-muted.mp4"),
            "https://media.example.com/splitter/jobs/abc/x-visual-muted.mp4"
        );
    }

    #[test]
    fn health_payload() {
        let json = serde_json::to_value(HealthResponse::default()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ffmpeg"], "required on PATH");
    }
}
