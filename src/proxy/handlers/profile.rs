use super::{forward, ProxyError};
use crate::proxy::ProxyState;
use axum::{
    body::Bytes,
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method},
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Backend endpoint profile updates are sent to.
pub const BACKEND_PROFILE_PATH: &str = "/api/user/profile";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    first_name: String,
    last_name: String,
    email: String,
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Backend response relayed verbatim", content_type = "application/json"),
        (status = 500, description = "Backend unreachable", body = ProxyError),
    ),
    tag = "profile"
)]
pub async fn update_profile(
    Extension(state): Extension<Arc<ProxyState>>,
    mut headers: HeaderMap,
    body: Bytes,
) -> Response {
    // The backend only accepts JSON profile updates.
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    forward(
        &state,
        Method::PUT,
        BACKEND_PROFILE_PATH,
        &headers,
        body,
        "Update failed",
    )
    .await
}
