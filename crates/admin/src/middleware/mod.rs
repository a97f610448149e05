//! HTTP middleware for admin.
//!
//! - `auth` - Sign-in extractors and session helpers
//! - `session` - tower-sessions layer

pub mod auth;
pub mod session;

pub use auth::{
    AdminAuthRejection, CurrentSession, RequireAdminAuth, clear_current_admin, expire_session,
    set_current_admin,
};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
