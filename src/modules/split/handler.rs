use crate::common::response::{ApiError, ErrorBody};
use crate::common::upload::receive_video;
use crate::config::settings::AppConfig;
use crate::modules::split::dto::{HealthResponse, SplitResponse};
use crate::modules::split::service::{SplitError, SplitService};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, header},
};
use tracing::{info, warn};
use url::Url;

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Split"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Split an uploaded video into a muted visual file and a black-video audio file.
#[utoipa::path(
    post,
    path = "/split",
    request_body(content = String, content_type = "multipart/form-data", description = "Video file in the `video` field"),
    responses(
        (status = 200, description = "Split completed", body = SplitResponse),
        (status = 400, description = "Missing file, wrong content type or malformed request", body = ErrorBody),
        (status = 401, description = "Invalid API key", body = ErrorBody),
        (status = 500, description = "ffmpeg failed on the visual stream", body = ErrorBody)
    ),
    params(
        ("key" = Option<String>, Query, description = "API key, alternative to the x-api-key header")
    ),
    tag = "Split",
    security(("api_key" = []))
)]
pub async fn split_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SplitResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart split request: {}", e);
        ApiError::MissingFile
    })?;

    let base_url = resolve_base_url(&state.config, &headers)?;

    let upload = receive_video(&state.storage, multipart, state.config.max_upload_bytes).await?;
    info!(
        "Received upload {:?} ({} bytes)",
        upload.original_name.as_deref().unwrap_or("<unnamed>"),
        upload.size
    );

    // Detached so a client disconnect cannot interrupt the transcode or its cleanup.
    let task_state = state.clone();
    let job = tokio::spawn(async move {
        let result = SplitService::split(task_state.clone(), upload).await?;
        let response = SplitResponse::build(&result, &base_url);

        // Retention is counted from the moment the response exists.
        task_state
            .cleanup
            .schedule(result.job_id, task_state.storage.job_dir(result.job_id));

        Ok::<_, SplitError>(response)
    });
    let response = job
        .await
        .map_err(|e| ApiError::internal(format!("split task aborted: {}", e)))??;

    Ok(Json(response))
}

/// Public base for download links: the configured override, else the
/// request's `Host` header.
pub fn resolve_base_url(config: &AppConfig, headers: &HeaderMap) -> Result<Url, ApiError> {
    let raw = match &config.public_base_url {
        Some(base) => base.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("localhost:{}", config.server_port));
            format!("http://{}", host)
        }
    };

    Url::parse(&raw).map_err(|_| ApiError::bad_request("Invalid Host header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(public_base_url: Option<&str>) -> AppConfig {
        AppConfig {
            server_port: 8080,
            api_key: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            cleanup_delay: Duration::from_secs(60),
            tmp_dir: PathBuf::from("tmp"),
            jobs_dir: PathBuf::from("jobs"),
            max_upload_bytes: 1024,
            public_base_url: public_base_url.map(str::to_owned),
        }
    }

    #[test]
    fn base_url_from_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("splitter.local:9000"));
        let url = resolve_base_url(&config(None), &headers).unwrap();
        assert_eq!(url.as_str(), "http://splitter.local:9000/");
    }

    #[test]
    fn base_url_without_host_uses_port() {
        let url = resolve_base_url(&config(None), &HeaderMap::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn configured_base_url_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8080"));
        let url = resolve_base_url(&config(Some("https://cdn.example.com")), &headers).unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn garbage_host_is_bad_request() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("bad host/with space"));
        let err = resolve_base_url(&config(None), &headers).unwrap_err();
        assert_eq!(err.code(), "BAD_REQUEST");
    }
}
