//! `AuthUser` extractor: pulls the access token from the Authorization header and verifies it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use coursehub_auth::{AccessClaims, INVALID_CREDENTIALS};
use coursehub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified claims of the caller's access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl std::ops::Deref for AuthUser {
    type Target = AccessClaims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        let claims = state.session_manager.authenticate(token.trim())?;
        Ok(AuthUser(claims))
    }
}
