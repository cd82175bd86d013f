use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

/// Multipart framing allowance on top of the file size cap.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub fn router(state: AppState) -> Router<AppState> {
    let body_limit = usize::try_from(state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES)
        .unwrap_or(usize::MAX);

    let public_routes = Router::new()
        .route("/healthz", get(handler::health));

    let protected_routes = Router::new()
        .route("/split", post(handler::split_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::api_key::api_key_guard,
        ));

    public_routes.merge(protected_routes)
}
