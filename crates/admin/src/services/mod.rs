//! Business logic services for admin.
//!
//! # Services
//!
//! - `dashboard` - Headline figures for the landing page
//! - `marketplace` - Record stores and mutations over the data source
//! - `merchant_form` - Merchant onboarding validation
//! - `notices` - Transient notifications
//! - `records` - Generic in-memory record store

pub mod dashboard;
pub mod marketplace;
pub mod merchant_form;
pub mod notices;
pub mod records;

pub use dashboard::{CustomerSummary, DashboardSummary, StatusCount};
pub use marketplace::{MarketplaceError, MarketplaceService};
pub use merchant_form::{FieldError, FormError, MerchantForm, NewMerchant};
pub use notices::{Notice, NoticeBoard, NoticeKind};
pub use records::{DataSource, RecordStore};
