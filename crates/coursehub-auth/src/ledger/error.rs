//! Ledger failure kinds.

use thiserror::Error;
use uuid::Uuid;

use coursehub_core::AppError;

/// Why the ledger refused a refresh secret.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No record has this secret's hash.
    #[error("refresh token not found")]
    NotFound,
    /// The record exists but is past `expires_at`.
    #[error("refresh token expired")]
    Expired,
    /// A rotation lost the race for this record.
    #[error("refresh token already revoked")]
    AlreadyRevoked,
    /// A revoked record was presented from a lineage that had nothing left
    /// to revoke: a repeated logout, or a secret from a signed-out session.
    #[error("refresh token revoked")]
    Revoked,
    /// A revoked record was presented while its lineage was still live; the
    /// whole lineage is now revoked.
    #[error("refresh token reuse detected in lineage {lineage_id}")]
    ReuseDetected {
        /// Owner of the lineage.
        user_id: Uuid,
        /// The revoked lineage.
        lineage_id: Uuid,
    },
    /// The backing store failed or timed out.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl LedgerError {
    /// Whether the caller may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Store(e) => e,
            _ => AppError::authentication(crate::INVALID_CREDENTIALS),
        }
    }
}
