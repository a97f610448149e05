//! Integration test helpers for the marketplace admin.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! Everything runs in-process: the admin router is driven with
//! `tower::ServiceExt::oneshot`, and the marketplace backend is a throwaway
//! axum server on `127.0.0.1:0`.
//!
//! # Test Categories
//!
//! - `admin_auth` - Demo sign-in and session handling
//! - `admin_tables` - Table views, export and mutations over mock data
//! - `api_client` - REST client and remote data source against a fake backend

#![allow(clippy::missing_panics_doc)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use serde_json::Value;
use tower::ServiceExt;

use marketplace_admin::config::AdminConfig;
use marketplace_admin::state::AppState;

/// Largest body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Configuration with every variable at its default (mock data source).
#[must_use]
pub fn mock_config() -> AdminConfig {
    AdminConfig::from_lookup(|_| None).expect("default configuration is valid")
}

/// Configuration reading from a remote backend at `api_base_url`.
#[must_use]
pub fn remote_config(api_base_url: &str) -> AdminConfig {
    let api_base_url = api_base_url.to_string();
    AdminConfig::from_lookup(move |key| match key {
        "ADMIN_DATA_SOURCE" => Some("remote".to_string()),
        "MARKETPLACE_API_BASE_URL" => Some(api_base_url.clone()),
        "MARKETPLACE_API_TIMEOUT_MS" => Some("5000".to_string()),
        _ => None,
    })
    .expect("remote configuration is valid")
}

/// The admin router over the built-in demo data.
#[must_use]
pub fn mock_app() -> Router {
    app_for(mock_config())
}

/// The admin router for `config`.
#[must_use]
pub fn app_for(config: AdminConfig) -> Router {
    marketplace_admin::app(AppState::new(config).expect("state builds"))
}

/// Send one request through `app`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

/// Build a request with an optional session cookie and JSON body.
#[must_use]
pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request is valid")
}

/// GET `uri` with an optional session cookie.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, cookie, None)
}

/// Read the response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("body is readable");
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("body is JSON")
}

/// The `name=value` part of the session cookie set by `response`.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(marketplace_admin::middleware::SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Sign in with the demo form and return the session cookie.
pub async fn login(app: &Router) -> String {
    let body = serde_json::json!({ "email": "anyone@example.com", "password": "x" });
    let response = send(app, request(Method::POST, "/api/auth/login", None, Some(&body))).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    session_cookie(&response).expect("login sets a session cookie")
}

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{addr}/api")
}
