//! Marketplace REST backend integration.
//!
//! This module provides:
//! - [`MarketplaceClient`] for the merchant, customer, order, analytics and
//!   auth endpoints
//! - [`ApiError`] with session expiry surfaced as its own variant

mod analytics;
mod auth;
mod client;
mod customers;
mod error;
mod merchants;
mod orders;

pub use auth::{ApiUser, LoginCredentials};
pub use client::MarketplaceClient;
pub use error::ApiError;
pub use merchants::{MerchantFilters, MerchantUpdate};
