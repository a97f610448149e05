//! Domain models for admin.

pub mod session;

pub use session::{CurrentAdmin, LoginForm, SessionContext, keys as session_keys};
