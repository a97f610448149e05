//! Core types for the marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! three record kinds the admin tables are built over.

pub mod analytics;
pub mod customer;
pub mod email;
pub mod id;
pub mod merchant;
pub mod money;
pub mod order;
pub mod status;

pub use analytics::Analytics;
pub use customer::Customer;
pub use email::{Email, EmailError};
pub use id::*;
pub use merchant::Merchant;
pub use money::Money;
pub use order::Order;
pub use status::*;
