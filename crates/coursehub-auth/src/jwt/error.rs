//! Access-token verification failures.

use thiserror::Error;

use coursehub_core::AppError;

/// Why an access token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The signature does not match the process key.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token is past its `exp`.
    #[error("token expired")]
    Expired,
    /// Anything else: bad encoding, wrong algorithm, missing claims.
    #[error("malformed token")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::authentication(crate::INVALID_CREDENTIALS)
    }
}
