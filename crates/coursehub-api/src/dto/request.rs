//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Body of refresh and logout requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Raw refresh secret.
    pub refresh_token: String,
}
