//! Account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use smart_bazaar_core::Identity;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_identity, set_current_identity};
use crate::state::AppState;

/// Registration form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_vendor: bool,
}

/// Sign-in form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create an account and sign in.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Identity>)> {
    let identity = state
        .identity()
        .sign_up(&form.email, &form.password, form.is_vendor)
        .await?;

    set_current_identity(&session, &identity).await?;
    set_sentry_user(&identity.id, Some(identity.email.as_str()));

    Ok((StatusCode::CREATED, Json(identity)))
}

/// Sign in.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginRequest>,
) -> Result<Json<Identity>> {
    let identity = state.identity().sign_in(&form.email, &form.password).await?;

    set_current_identity(&session, &identity).await?;
    set_sentry_user(&identity.id, Some(identity.email.as_str()));
    tracing::info!(uid = %identity.id, "User logged in");

    Ok(Json(identity))
}

/// Sign out. Succeeds when already signed out.
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(identity): OptionalAuth,
) -> Result<StatusCode> {
    if let Some(identity) = identity {
        state.identity().sign_out(&identity).await?;
    }
    clear_current_identity(&session).await?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in identity.
///
/// GET /api/auth/me
pub async fn me(RequireAuth(identity): RequireAuth) -> Json<Identity> {
    Json(identity)
}
