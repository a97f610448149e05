//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::instrument;

use marketplace_core::{Order, OrderStatus};

use super::tables::{TableParams, csv_response, serve_stale_on_error, table_response};
use crate::components::orders_table_config;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Body of `PATCH /api/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(index))
        .route("/api/orders/export.csv", get(export))
        .route("/api/orders/{id}", get(show))
        .route("/api/orders/{id}/status", patch(update_status))
}

/// GET /api/orders
#[instrument(skip(state, params))]
async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_orders().await)?;
    let orders = state.marketplace().orders().read().await;
    table_response(&orders, &orders_table_config(), &params)
}

/// GET /api/orders/export.csv
#[instrument(skip(state, params))]
async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_orders().await)?;
    let orders = state.marketplace().orders().read().await;
    csv_response(&orders, &orders_table_config(), &params)
}

/// GET /api/orders/{id}
#[instrument(skip(state))]
async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.marketplace().order(&id).await?))
}

/// PATCH /api/orders/{id}/status
#[instrument(skip(admin, state), fields(admin = %admin.email))]
async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .marketplace()
        .update_order_status(&id, update.status)
        .await?;
    Ok(Json(order))
}
