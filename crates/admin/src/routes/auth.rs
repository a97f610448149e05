//! Authentication route handlers for admin.
//!
//! Demo sign-in: any submitted form signs in as the fixed demo admin.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request},
    http::header,
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::middleware::{CurrentSession, clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, LoginForm, SessionContext};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Read the login form from a JSON or URL-encoded body.
async fn read_login_form(request: Request) -> Result<LoginForm, AppError> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        let Json(form) = Json::<LoginForm>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(form)
    } else {
        let Form(form) = Form::<LoginForm>::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(form)
    }
}

/// Sign in.
///
/// POST /api/auth/login
#[instrument(skip_all)]
async fn login(session: Session, request: Request) -> Result<Json<CurrentAdmin>, AppError> {
    let form = read_login_form(request).await?;

    let mut context = SessionContext::default();
    let admin = context
        .login(&form)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(admin))
}

/// Sign out and clear the session.
///
/// POST /api/auth/logout
#[instrument(skip_all)]
async fn logout(
    CurrentSession(mut context): CurrentSession,
    session: Session,
) -> Result<Json<SessionContext>, AppError> {
    if let Some(admin) = context.admin() {
        info!(admin = %admin.email, "Admin signed out");
    }
    context.logout();

    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(context))
}

/// Current sign-in state.
///
/// GET /api/auth/me
async fn me(CurrentSession(context): CurrentSession) -> Json<SessionContext> {
    Json(context)
}
