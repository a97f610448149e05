//! Marketplace API errors.

use thiserror::Error;

/// Errors that can occur when talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout).
    #[error("Marketplace API request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Marketplace API response error: {0}")]
    Response(String),

    /// The backend rejected the bearer token. The token has been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// The backend refused access to the resource.
    #[error("Access forbidden")]
    Forbidden,

    /// The backend answered with another non-success status.
    #[error("Marketplace API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The configured base URL cannot have paths appended.
    #[error("Invalid marketplace API URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Whether the backend answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
