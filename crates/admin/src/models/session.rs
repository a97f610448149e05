//! Session-related types for admin authentication.
//!
//! The demo gate accepts any login and grants one fixed identity. It is a
//! placeholder for a real identity provider, not a security boundary.

use serde::{Deserialize, Serialize};

use marketplace_core::{AdminRole, Email};

/// Session-stored admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's identifier.
    pub id: String,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// The identity every demo login receives.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the fixed address is a valid email.
    pub fn demo() -> Result<Self, marketplace_core::EmailError> {
        Ok(Self {
            id: "1".to_string(),
            email: Email::parse(DEMO_EMAIL)?,
            name: DEMO_NAME.to_string(),
            role: AdminRole::SuperAdmin,
        })
    }
}

/// Display name of the demo identity.
pub const DEMO_NAME: &str = "John Doe";

/// Email of the demo identity.
pub const DEMO_EMAIL: &str = "admin@nearu.com";

/// Login form. Any values are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Authentication state handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "admin", rename_all = "snake_case")]
pub enum SessionContext {
    #[default]
    Unauthenticated,
    Authenticated(CurrentAdmin),
}

impl SessionContext {
    /// Submit a login. Always succeeds with the demo identity.
    ///
    /// # Errors
    ///
    /// Only if the demo identity cannot be built.
    pub fn login(&mut self, form: &LoginForm) -> Result<CurrentAdmin, marketplace_core::EmailError> {
        tracing::info!(submitted_email = %form.email, "demo login accepted");
        let admin = CurrentAdmin::demo()?;
        *self = Self::Authenticated(admin.clone());
        Ok(admin)
    }

    /// Sign out.
    pub fn logout(&mut self) {
        *self = Self::Unauthenticated;
    }

    #[must_use]
    pub const fn admin(&self) -> Option<&CurrentAdmin> {
        match self {
            Self::Authenticated(admin) => Some(admin),
            Self::Unauthenticated => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<CurrentAdmin>> for SessionContext {
    fn from(admin: Option<CurrentAdmin>) -> Self {
        admin.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
