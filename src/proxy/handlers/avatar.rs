use super::{forward, ProxyError};
use crate::proxy::ProxyState;
use axum::{
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, Method},
    response::Response,
};
use std::sync::Arc;

/// Backend endpoint for avatar upload and removal.
pub const BACKEND_AVATAR_PATH: &str = "/api/avatar";

/// Upload size accepted by the proxy, leaving room for multipart framing
/// around a 5 MB image.
pub const MAX_UPLOAD_BYTES: usize = 6 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/api/avatar",
    request_body(content = String, description = "Multipart form with a `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Backend response relayed verbatim", content_type = "application/json"),
        (status = 500, description = "Backend unreachable", body = ProxyError),
    ),
    tag = "avatar"
)]
pub async fn upload_avatar(
    Extension(state): Extension<Arc<ProxyState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        BACKEND_AVATAR_PATH,
        &headers,
        body,
        "Upload failed",
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/avatar",
    responses(
        (status = 200, description = "Backend response relayed verbatim", content_type = "application/json"),
        (status = 500, description = "Backend unreachable", body = ProxyError),
    ),
    tag = "avatar"
)]
pub async fn delete_avatar(
    Extension(state): Extension<Arc<ProxyState>>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::DELETE,
        BACKEND_AVATAR_PATH,
        &headers,
        Bytes::new(),
        "Delete failed",
    )
    .await
}
