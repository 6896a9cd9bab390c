//! Auth handlers: login, refresh, logout, logout-all, me.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, info};

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{MeResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;
    Ok(Json(tokens.into()))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = state.session_manager.refresh(&req.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// POST /auth/logout
///
/// Unknown, expired or already-revoked secrets still answer 204, and so
/// does a missing or unreadable body. The body is parsed by hand so the
/// content type is not enforced.
pub async fn logout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    match serde_json::from_slice::<RefreshRequest>(&body) {
        Ok(req) if !req.refresh_token.is_empty() => {
            state.session_manager.logout(&req.refresh_token).await?;
        }
        Ok(_) => debug!("Logout without a refresh token"),
        Err(e) => debug!(error = %e, "Unreadable logout body, nothing to revoke"),
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    let revoked = state.session_manager.logout_all(&auth).await?;
    info!(user_id = %auth.user_id(), revoked, "Signed out of every session");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(&auth.0))
}
