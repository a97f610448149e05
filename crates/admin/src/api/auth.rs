//! Backend authentication endpoints.

use reqwest::Method;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::client::MarketplaceClient;
use super::error::ApiError;

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// User profile returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    user: ApiUser,
}

impl MarketplaceClient {
    /// Log in and keep the returned token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<ApiUser, ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let response: LoginResponse = self
            .fetch(Method::POST, &["auth", "login"], &[], Some(body))
            .await?;

        if let Some(token) = response.token.filter(|t| !t.is_empty()) {
            self.set_token(SecretString::from(token)).await;
        }
        info!(user = %response.user.email, "Logged in to marketplace API");
        Ok(response.user)
    }

    /// Log out and forget the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the token is kept in that case.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, &["auth", "logout"], None).await?;
        self.clear_token().await;
        Ok(())
    }

    /// Profile of the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<ApiUser, ApiError> {
        self.fetch(Method::GET, &["auth", "me"], &[], None).await
    }
}
