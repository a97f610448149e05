//! Marketplace REST API client.
//!
//! Thin wrapper over `reqwest` that attaches the bearer token, logs traffic
//! in development and turns 401/403 responses into typed errors.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::error::ApiError;
use crate::config::MarketplaceApiConfig;

/// Marketplace REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the token.
///
/// # Authentication
///
/// Holds at most one bearer token in memory. Any 401 from the backend clears
/// it and surfaces as [`ApiError::SessionExpired`].
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    log_traffic: bool,
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl MarketplaceClient {
    /// Create a new client.
    ///
    /// `log_traffic` enables debug logging of every request and response.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// cannot carry a path.
    pub fn new(config: &MarketplaceApiConfig, log_traffic: bool) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::Url(config.base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                http,
                base_url: config.base_url.clone(),
                token: RwLock::new(config.token.clone()),
                log_traffic,
            }),
        })
    }

    /// Store a bearer token for subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Forget the bearer token.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// Whether a bearer token is held.
    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Build the URL for `segments` below the base URL.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send a request and map non-success statuses to errors.
    #[instrument(skip(self, query, body), fields(path = %segments.join("/")))]
    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(segments, query)?;
        let token = self.inner.token.read().await.clone();

        if self.inner.log_traffic {
            debug!(
                method = %method,
                url = %url,
                authenticated = token.is_some(),
                body = ?body,
                "Marketplace API request"
            );
        }

        let mut request = self.inner.http.request(method, url.clone());
        if let Some(token) = &token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Marketplace API request failed");
            ApiError::Request(e.to_string())
        })?;

        let status = response.status();
        if self.inner.log_traffic {
            debug!(status = status.as_u16(), url = %url, "Marketplace API response");
        }

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(url = %url, "Marketplace API rejected token, clearing session");
                self.clear_token().await;
                Err(ApiError::SessionExpired)
            }
            StatusCode::FORBIDDEN => {
                error!(url = %url, "Access forbidden");
                Err(ApiError::Forbidden)
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
                if self.inner.log_traffic {
                    debug!(status = status.as_u16(), url = %url, message = %message, "Marketplace API error");
                }
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Send a request and decode the JSON response body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        self.execute(method, segments, query, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Response(e.to_string()))
    }

    /// Send a request whose response body is ignored.
    pub(crate) async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<(), ApiError> {
        self.execute(method, segments, &[], body).await.map(|_| ())
    }
}
