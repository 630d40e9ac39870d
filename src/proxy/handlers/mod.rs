pub mod avatar;
pub mod health;
pub mod profile;

// common functions for the handlers
use super::ProxyState;
use crate::client::api::build_url_with_base;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    http::{
        header::{CONTENT_TYPE, COOKIE},
        HeaderMap, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

/// Cookie carrying the backend session.
pub const AUTH_COOKIE: &str = "auth_token";

/// Body returned when the backend cannot be reached or answers garbage.
#[derive(ToSchema, Serialize, Debug, PartialEq, Eq)]
pub struct ProxyError {
    pub error: String,
}

/// Finds the auth cookie among all `Cookie` headers.
#[must_use]
pub fn auth_cookie(headers: &HeaderMap) -> Option<SecretString> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| SecretString::from(value.to_string()))
}

/// Forwards a request to the backend and relays its status and JSON body.
/// Any transport failure or non-JSON body becomes a 500 with `failure` as
/// the error text.
#[instrument(skip(state, headers, body), fields(body.len = body.len()))]
pub async fn forward(
    state: &ProxyState,
    method: Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
    failure: &str,
) -> Response {
    let url = build_url_with_base(state.backend_url(), path);
    let mut request = state.http().request(method, url);

    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        request = request.header(CONTENT_TYPE, content_type.clone());
    }
    if let Some(request_id) = headers.get("x-request-id") {
        request = request.header("x-request-id", request_id.clone());
    }
    match auth_cookie(headers) {
        Some(token) => {
            request = request.header(COOKIE, format!("{AUTH_COOKIE}={}", token.expose_secret()));
        }
        None => debug!("no auth cookie on proxied request"),
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    match relay(request).await {
        Ok((status, Some(body))) => (status, Json(body)).into_response(),
        Ok((status, None)) => status.into_response(),
        Err(err) => {
            error!("proxy request failed: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProxyError {
                    error: failure.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn relay(request: reqwest::RequestBuilder) -> Result<(StatusCode, Option<Value>)> {
    let response = request.send().await.context("backend unreachable")?;
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .context("failed to read backend body")?;

    // Empty bodies (204, bare 200) are relayed as status only.
    if bytes.is_empty() {
        return Ok((status, None));
    }

    let body = serde_json::from_slice::<Value>(&bytes)
        .with_context(|| format!("backend returned a non-JSON body ({status})"))?;
    Ok((status, Some(body)))
}
