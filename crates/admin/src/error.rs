//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::ApiError;
use crate::components::ViewError;
use crate::middleware::auth::LOGIN_PATH;
use crate::services::{FormError, MarketplaceError};

/// Response extension marking a response caused by an expired backend
/// session. The session middleware clears the admin session when it sees it.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Marketplace backend call failed.
    #[error("Marketplace API error: {0}")]
    Upstream(ApiError),

    /// The backend rejected our token.
    #[error("Session expired")]
    SessionExpired,

    /// Submitted form failed validation.
    #[error(transparent)]
    Validation(#[from] FormError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::SessionExpired => Self::SessionExpired,
            ApiError::Forbidden => Self::Forbidden("Access forbidden".to_string()),
            other => Self::Upstream(other),
        }
    }
}

impl From<MarketplaceError> for AppError {
    fn from(err: MarketplaceError) -> Self {
        match err {
            MarketplaceError::Api(e) => e.into(),
            MarketplaceError::NotFound { kind, id } => Self::NotFound(format!("{kind} {id}")),
            MarketplaceError::Invalid(e) => Self::Validation(e),
            MarketplaceError::MockData(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Internal(_) | Self::Upstream(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SessionExpired => {
                tracing::warn!("Marketplace session expired, signing out");
                let mut response = Redirect::to(LOGIN_PATH).into_response();
                response.extensions_mut().insert(SessionExpired);
                return response;
            }
        };

        if let Self::Validation(form) = &self {
            return (
                status,
                Json(json!({ "error": "Validation failed", "fields": form.errors })),
            )
                .into_response();
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Upstream(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
