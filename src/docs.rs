use utoipa::OpenApi;
use crate::common::response::ErrorBody;
use crate::modules::split::dto::{Downloads, HealthResponse, SplitResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::split::handler::health,
        crate::modules::split::handler::split_video,
    ),
    components(
        schemas(HealthResponse, SplitResponse, Downloads, ErrorBody)
    ),
    tags(
        (name = "Split", description = "Split a video into visual-only and audio-only files")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    crate::middleware::api_key::API_KEY_HEADER,
                ))),
            );
        }
    }
}
