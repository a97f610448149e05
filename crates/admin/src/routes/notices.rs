//! Notice route handler.

use axum::{Json, Router, extract::State, routing::get};

use crate::middleware::RequireAdminAuth;
use crate::services::Notice;
use crate::state::AppState;

/// Build the notices router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/notices", get(drain))
}

/// GET /api/notices
///
/// Returns and forgets every pending notice, oldest first.
async fn drain(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Json<Vec<Notice>> {
    Json(state.marketplace().notices().drain())
}
