//! Merchant route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use marketplace_core::Merchant;

use super::tables::{TableParams, csv_response, serve_stale_on_error, table_response};
use crate::components::merchants_table_config;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::services::MerchantForm;
use crate::state::AppState;

/// Build the merchants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/merchants", get(index).post(create))
        .route("/api/merchants/export.csv", get(export))
        .route("/api/merchants/{id}", get(show).delete(destroy))
}

/// GET /api/merchants
#[instrument(skip(state, params))]
async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_merchants().await)?;
    let merchants = state.marketplace().merchants().read().await;
    table_response(&merchants, &merchants_table_config(&merchants), &params)
}

/// GET /api/merchants/export.csv
#[instrument(skip(state, params))]
async fn export(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Response, AppError> {
    serve_stale_on_error(state.marketplace().refresh_merchants().await)?;
    let merchants = state.marketplace().merchants().read().await;
    csv_response(&merchants, &merchants_table_config(&merchants), &params)
}

/// GET /api/merchants/{id}
#[instrument(skip(state))]
async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Merchant>, AppError> {
    Ok(Json(state.marketplace().merchant(&id).await?))
}

/// POST /api/merchants
#[instrument(skip(admin, state, form), fields(admin = %admin.email))]
async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(form): Json<MerchantForm>,
) -> Result<impl IntoResponse, AppError> {
    let merchant = state.marketplace().create_merchant(&form).await?;
    Ok((StatusCode::CREATED, Json(merchant)))
}

/// DELETE /api/merchants/{id}
#[instrument(skip(admin, state), fields(admin = %admin.email))]
async fn destroy(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.marketplace().delete_merchant(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
