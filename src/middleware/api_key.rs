use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY: &str = "key";

/// Rejects the request unless it carries the configured key in the
/// `x-api-key` header or the `key` query parameter. No configured key means
/// no gate.
pub async fn api_key_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            req.uri().query().and_then(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(name, _)| name == API_KEY_QUERY)
                    .map(|(_, value)| value.into_owned())
            })
        });

    match provided {
        Some(key) if key == expected => Ok(next.run(req).await),
        _ => Err(ApiError::InvalidApiKey),
    }
}
