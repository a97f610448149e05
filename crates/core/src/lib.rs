//! Marketplace Core - Shared types library.
//!
//! This crate provides the types shared by every marketplace admin component:
//! - `admin` - Back-office service and tabular view engine
//! - `cli` - Command-line viewing and CSV export
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`value`] - Dynamically typed field values with a total ordering
//! - [`record`] - The [`Record`] trait and the schemaless [`Row`]
//! - [`types`] - Entities, newtype IDs, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod record;
pub mod types;
pub mod value;

pub use record::{Record, RecordError, Row};
pub use types::*;
pub use value::Value;
