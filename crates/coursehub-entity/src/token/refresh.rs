//! Refresh token ledger record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored refresh token.
///
/// Only the SHA-256 hash of the secret is kept. Records are never deleted;
/// the only mutation after insert is setting `revoked_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique record identifier.
    pub id: Uuid,
    /// Owner of the session.
    pub user_id: Uuid,
    /// Hex SHA-256 of the raw secret.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Root record id of the rotation chain this token belongs to.
    pub lineage_id: Uuid,
    /// Predecessor in the rotation chain.
    pub rotated_from_id: Option<Uuid>,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the token was revoked (logout, rotation or theft detection).
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Whether the token has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Whether the token is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether this token is the usable head of its lineage at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }
}

/// Data needed to insert a new ledger record.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    /// Record id, chosen by the caller so a lineage root can reference itself.
    pub id: Uuid,
    /// Owner of the session.
    pub user_id: Uuid,
    /// Hex SHA-256 of the raw secret.
    pub token_hash: String,
    /// Root record id of the rotation chain.
    pub lineage_id: Uuid,
    /// Predecessor in the rotation chain.
    pub rotated_from_id: Option<Uuid>,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshToken {
    /// Materialize the record as it will look once stored.
    pub fn into_record(self) -> RefreshToken {
        RefreshToken {
            id: self.id,
            user_id: self.user_id,
            token_hash: self.token_hash,
            lineage_id: self.lineage_id,
            rotated_from_id: self.rotated_from_id,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            revoked_at: None,
        }
    }
}
