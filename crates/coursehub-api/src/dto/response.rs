//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coursehub_auth::{AccessClaims, SessionTokens};
use coursehub_entity::user::UserRole;
use coursehub_media::WebhookAck;

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token.
    pub refresh_token: String,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<SessionTokens> for TokenResponse {
    fn from(tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: "Bearer".to_string(),
            access_expires_at: tokens.access_expires_at,
            refresh_token: tokens.refresh_token,
            refresh_expires_at: tokens.refresh_expires_at,
        }
    }
}

/// Identity carried by the caller's access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Role at issue time.
    pub role: UserRole,
    /// Session lineage.
    pub session_id: Uuid,
    /// Issued at.
    pub issued_at: DateTime<Utc>,
    /// Expires at.
    pub expires_at: DateTime<Utc>,
}

impl From<&AccessClaims> for MeResponse {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            user_id: claims.user_id(),
            role: claims.role,
            session_id: claims.session_lineage_id(),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }
}

/// Webhook acknowledgement.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WebhookResponse {
    /// `accepted`, `duplicate`, `ignored` or `unroutable`.
    pub status: WebhookAck,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database status, when a database is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Cache status.
    pub cache: String,
}
