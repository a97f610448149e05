//! Dashboard route handler.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use super::tables::serve_stale_on_error;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::services::DashboardSummary;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(index))
}

/// GET /api/dashboard
#[instrument(skip(state))]
async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    serve_stale_on_error(state.marketplace().refresh_all().await)?;
    Ok(Json(state.marketplace().dashboard().await))
}
