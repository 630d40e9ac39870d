//! HTTP helpers for the account API with consistent timeouts and error
//! handling. The underlying `reqwest` client keeps a cookie jar, so the
//! session cookie set by `/auth/login` is sent on every later call the same
//! way a browser sends ambient credentials.

use super::{config::ClientConfig, errors::ClientError};
use reqwest::{multipart::Form, Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a cookie-aware client for the configured API base URL.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches JSON and returns `None` on 204 or 401.
    pub async fn get_optional_json(&self, path: &str) -> Result<Option<Value>, ClientError> {
        let response = send(self.http.get(self.url(path))).await?;
        handle_optional_json_response(response).await
    }

    /// Posts JSON and expects no meaningful response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<(), ClientError> {
        let response = send(self.http.post(self.url(path)).json(body)).await?;
        handle_empty_response(response, fallback).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<(), ClientError> {
        let response = send(self.http.put(self.url(path)).json(body)).await?;
        handle_empty_response(response, fallback).await
    }

    /// Posts an empty body, used to clear a session.
    pub async fn post_empty(&self, path: &str, fallback: &str) -> Result<(), ClientError> {
        let response = send(self.http.post(self.url(path))).await?;
        handle_empty_response(response, fallback).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        fallback: &str,
    ) -> Result<(), ClientError> {
        let response = send(self.http.post(self.url(path)).multipart(form)).await?;
        handle_empty_response(response, fallback).await
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> Result<(), ClientError> {
        let response = send(self.http.delete(self.url(path))).await?;
        handle_empty_response(response, fallback).await
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Pulls a human-readable message out of an error body, `message` first.
#[must_use]
pub fn extract_error_message(body: &Value) -> Option<String> {
    let message = match body {
        Value::String(text) => Some(text.as_str()),
        Value::Object(fields) => ["message", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;

    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}

/// Message for a failed response: the backend's own text when the body is
/// JSON and carries one, `"{fallback}: {status}"` otherwise.
#[must_use]
pub fn error_message(status: StatusCode, body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| extract_error_message(&value))
        .unwrap_or_else(|| format!("{fallback}: {}", status.as_u16()))
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    request.send().await.map_err(map_request_error)
}

fn map_request_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        warn!("request timed out: {err}");
        ClientError::Timeout(err.to_string())
    } else {
        warn!("unable to reach the server: {err}");
        ClientError::Network(err.to_string())
    }
}

async fn http_error(response: Response, fallback: &str) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "backend returned an error");
    ClientError::Http {
        status: status.as_u16(),
        message: error_message(status, &body, fallback),
    }
}

async fn handle_empty_response(response: Response, fallback: &str) -> Result<(), ClientError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response, fallback).await)
    }
}

async fn handle_optional_json_response(response: Response) -> Result<Option<Value>, ClientError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::UNAUTHORIZED {
        return Ok(None);
    }
    if status.is_success() {
        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(http_error(response, "Failed to fetch user").await)
    }
}
