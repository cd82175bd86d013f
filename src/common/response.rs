use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

pub const MISSING_FILE_HINT: &str = "send multipart/form-data with field \"video\"";

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing-file")]
    MissingFile,

    #[error("{0}")]
    InvalidFileType(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("invalid-api-key")]
    InvalidApiKey,

    #[error("ffmpeg-failed: {0}")]
    FfmpegFailed(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::InvalidFileType(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::FfmpegFailed(_) | ApiError::Internal(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::InvalidFileType(_) => "INVALID_FILE_TYPE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidApiKey => "INVALID_API_KEY",
            ApiError::FfmpegFailed(_) => "FFMPEG_FAILED",
            ApiError::Internal(_) | ApiError::Io(_) => "INTERNAL_ERROR",
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, hint, detail) = match self {
            ApiError::MissingFile => ("missing-file".to_string(), Some(MISSING_FILE_HINT.to_string()), None),
            ApiError::InvalidFileType(msg) | ApiError::BadRequest(msg) => (msg.clone(), None, None),
            ApiError::InvalidApiKey => ("invalid-api-key".to_string(), None, None),
            ApiError::FfmpegFailed(detail) => ("ffmpeg-failed".to_string(), None, Some(detail.clone())),
            // Internal causes are logged, never sent to the client.
            ApiError::Internal(_) | ApiError::Io(_) => ("internal-error".to_string(), None, None),
        };

        ErrorBody {
            error,
            code: self.code().to_string(),
            hint,
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Internal(_) | ApiError::Io(_)) {
            error!("Request failed: {}", self);
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            ApiError::MissingFile,
            ApiError::InvalidFileType("Only video files are allowed".into()),
            ApiError::bad_request("File too large"),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn missing_file_carries_hint() {
        let body = serde_json::to_value(ApiError::MissingFile.body()).unwrap();
        assert_eq!(body["error"], "missing-file");
        assert_eq!(body["code"], "MISSING_FILE");
        assert_eq!(body["hint"], MISSING_FILE_HINT);
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn ffmpeg_failure_exposes_detail() {
        let err = ApiError::FfmpegFailed("Invalid data found when processing input".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["code"], "FFMPEG_FAILED");
        assert_eq!(body["detail"], "Invalid data found when processing input");
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = ApiError::internal("/srv/jobs/abc: permission denied");
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], "internal-error");
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("/srv/jobs"));
    }

    #[test]
    fn invalid_key_is_unauthorized() {
        assert_eq!(ApiError::InvalidApiKey.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidApiKey.code(), "INVALID_API_KEY");
    }
}
