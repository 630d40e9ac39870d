use super::handlers::{avatar, health, profile, ProxyError};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        profile::update_profile,
        avatar::upload_avatar,
        avatar::delete_avatar,
    ),
    components(schemas(ProxyError, profile::ProfileUpdate, health::Health)),
    tags(
        (name = "health", description = "Liveness and build information"),
        (name = "profile", description = "Profile updates forwarded to the backend"),
        (name = "avatar", description = "Avatar upload and removal forwarded to the backend"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
