//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Auth (demo sign-in)
//! POST   /api/auth/login              - Sign in (JSON or form body)
//! POST   /api/auth/logout             - Sign out
//! GET    /api/auth/me                 - Current sign-in state
//!
//! # Dashboard
//! GET    /api/dashboard               - Totals, recent orders, status counts
//! GET    /api/notices                 - Drain pending notices
//!
//! # Tables (see `tables` for the query parameters)
//! GET    /api/merchants               - Merchant view
//! POST   /api/merchants               - Create merchant
//! GET    /api/merchants/export.csv    - Merchant CSV export
//! GET    /api/merchants/{id}          - Merchant detail
//! DELETE /api/merchants/{id}          - Delete merchant
//! GET    /api/customers               - Customer view
//! GET    /api/customers/export.csv    - Customer CSV export
//! GET    /api/customers/{id}          - Customer detail
//! GET    /api/orders                  - Order view
//! GET    /api/orders/export.csv       - Order CSV export
//! GET    /api/orders/{id}             - Order detail
//! PATCH  /api/orders/{id}/status      - Change order status
//! ```

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod merchants;
pub mod notices;
pub mod orders;
pub mod tables;

use axum::Router;

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(notices::router())
        .merge(merchants::router())
        .merge(customers::router())
        .merge(orders::router())
}
