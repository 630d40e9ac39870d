//! Same-origin proxy in front of the account backend. Each route forwards
//! the request body, content type, and `auth_token` cookie to the backend
//! and relays status and JSON body unchanged.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post, put},
    Extension, Router,
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod handlers;
mod openapi;

pub use handlers::{auth_cookie, ProxyError, AUTH_COOKIE};
pub use openapi::openapi;

pub const PROFILE_ROUTE: &str = "/api/auth/profile";
pub const AVATAR_ROUTE: &str = "/api/avatar";

/// Time allowed for a single backend round trip.
const BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state for the proxy handlers.
#[derive(Debug)]
pub struct ProxyState {
    http: Client,
    backend_url: String,
}

impl ProxyState {
    /// # Errors
    /// Returns an error if the backend URL is not an absolute http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(backend_url: &str) -> Result<Self> {
        let parsed = Url::parse(backend_url.trim())
            .with_context(|| format!("Invalid backend URL: {backend_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Backend URL must use http or https: {backend_url}");
        }

        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(BACKEND_TIMEOUT)
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            http,
            backend_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

/// Build the proxy router with request-id and tracing layers.
#[must_use]
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .route(PROFILE_ROUTE, put(handlers::profile::update_profile))
        .route(
            AVATAR_ROUTE,
            post(handlers::avatar::upload_avatar)
                .delete(handlers::avatar::delete_avatar)
                .layer(DefaultBodyLimit::max(handlers::avatar::MAX_UPLOAD_BYTES)),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the proxy server
/// # Errors
/// Return error if the backend URL is invalid or the listener fails
pub async fn new(port: u16, backend_url: &str) -> Result<()> {
    let state = Arc::new(ProxyState::new(backend_url)?);
    let app = router(state.clone());

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!(
        "Listening on [::]:{}, forwarding to {}",
        port,
        state.backend_url()
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; run until the process is killed.
                std::future::pending::<()>().await;
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
