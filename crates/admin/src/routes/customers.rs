//! Customer route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use tracing::instrument;

use marketplace_core::Customer;

use super::tables::{TableParams, csv_response, serve_stale_on_error, table_response};
use crate::components::customers_table_config;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/customers", get(index))
        .route("/api/customers/export.csv", get(export))
        .route("/api/customers/{id}", get(show))
}

/// GET /api/customers
#[instrument(skip(state, params))]
async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_customers().await)?;
    let customers = state.marketplace().customers().read().await;
    table_response(&customers, &customers_table_config(), &params)
}

/// GET /api/customers/export.csv
#[instrument(skip(state, params))]
async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_customers().await)?;
    let customers = state.marketplace().customers().read().await;
    csv_response(&customers, &customers_table_config(), &params)
}

/// GET /api/customers/{id}
#[instrument(skip(state))]
async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.marketplace().customer(&id).await?))
}
