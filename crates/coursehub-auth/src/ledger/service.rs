//! Refresh token ledger operations.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use coursehub_core::config::AuthConfig;
use coursehub_core::deadline::within;
use coursehub_entity::token::{NewRefreshToken, RefreshToken};

use super::error::LedgerError;
use super::secret;
use super::store::RefreshTokenStore;

/// A newly issued refresh token. `secret` is never retrievable again.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    /// Raw secret to hand to the client.
    pub secret: String,
    /// The stored record.
    pub record: RefreshToken,
}

/// Issues, verifies, rotates and revokes refresh tokens.
///
/// Every store call is bounded by the configured store timeout.
#[derive(Debug, Clone)]
pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
    ttl: chrono::Duration,
    store_timeout: Duration,
}

impl RefreshTokenLedger {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<dyn RefreshTokenStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            ttl: chrono::Duration::days(config.refresh_ttl_days as i64),
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Issues a token for `user_id`. Without `lineage_root` a new lineage
    /// starts with this record as its root.
    pub async fn issue(
        &self,
        user_id: Uuid,
        lineage_root: Option<Uuid>,
    ) -> Result<IssuedRefreshToken, LedgerError> {
        let raw = secret::generate();
        let next = self.new_record(user_id, &raw, lineage_root, None);
        let record = within(self.store_timeout, "refresh token insert", self.store.insert(next))
            .await?;

        debug!(user_id = %user_id, lineage_id = %record.lineage_id, "Refresh token issued");
        Ok(IssuedRefreshToken {
            secret: raw,
            record,
        })
    }

    /// Resolves a raw secret to its live record.
    ///
    /// Presenting a revoked secret is treated as theft: the whole lineage is
    /// revoked before [`LedgerError::ReuseDetected`] is returned. When the
    /// lineage was already fully revoked nothing changes and the result is
    /// [`LedgerError::Revoked`], with no audit event.
    pub async fn verify_and_consume(&self, raw: &str) -> Result<RefreshToken, LedgerError> {
        let hash = secret::hash(raw);
        let record = within(
            self.store_timeout,
            "refresh token lookup",
            self.store.find_by_hash(&hash),
        )
        .await?
        .ok_or(LedgerError::NotFound)?;

        if record.is_revoked() {
            let revoked = self.revoke_lineage(record.lineage_id).await?;
            if revoked == 0 {
                debug!(
                    user_id = %record.user_id,
                    lineage_id = %record.lineage_id,
                    token_id = %record.id,
                    "Revoked refresh token presented for a closed lineage"
                );
                return Err(LedgerError::Revoked);
            }
            warn!(
                target: "coursehub::audit",
                user_id = %record.user_id,
                lineage_id = %record.lineage_id,
                token_id = %record.id,
                revoked,
                "Refresh token reuse detected, lineage revoked"
            );
            return Err(LedgerError::ReuseDetected {
                user_id: record.user_id,
                lineage_id: record.lineage_id,
            });
        }

        if record.is_expired_at(Utc::now()) {
            return Err(LedgerError::Expired);
        }

        Ok(record)
    }

    /// Revokes one record. Revoking an already-revoked record is a no-op.
    pub async fn revoke(&self, id: Uuid) -> Result<(), LedgerError> {
        let changed = within(self.store_timeout, "refresh token revoke", self.store.revoke(id))
            .await?;
        debug!(token_id = %id, changed, "Refresh token revoked");
        Ok(())
    }

    /// Atomically revokes `old` and issues its successor in the same lineage.
    ///
    /// Fails with [`LedgerError::AlreadyRevoked`] when a concurrent rotation
    /// of the same record won.
    pub async fn rotate(&self, old: &RefreshToken) -> Result<IssuedRefreshToken, LedgerError> {
        let raw = secret::generate();
        let next = self.new_record(old.user_id, &raw, Some(old.lineage_id), Some(old.id));
        let record = within(
            self.store_timeout,
            "refresh token rotate",
            self.store.rotate(old.id, next),
        )
        .await?
        .ok_or(LedgerError::AlreadyRevoked)?;

        debug!(
            user_id = %old.user_id,
            lineage_id = %old.lineage_id,
            from = %old.id,
            to = %record.id,
            "Refresh token rotated"
        );
        Ok(IssuedRefreshToken {
            secret: raw,
            record,
        })
    }

    /// Revokes every live record of a lineage.
    pub async fn revoke_lineage(&self, lineage_id: Uuid) -> Result<u64, LedgerError> {
        Ok(within(
            self.store_timeout,
            "refresh lineage revoke",
            self.store.revoke_lineage(lineage_id),
        )
        .await?)
    }

    /// Revokes every live record of a user.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, LedgerError> {
        let revoked = within(
            self.store_timeout,
            "refresh token revoke all",
            self.store.revoke_all_for_user(user_id),
        )
        .await?;
        info!(
            target: "coursehub::audit",
            user_id = %user_id,
            revoked,
            "All refresh tokens revoked for user"
        );
        Ok(revoked)
    }

    fn new_record(
        &self,
        user_id: Uuid,
        raw: &str,
        lineage_root: Option<Uuid>,
        rotated_from_id: Option<Uuid>,
    ) -> NewRefreshToken {
        let id = Uuid::new_v4();
        let issued_at = Utc::now();
        NewRefreshToken {
            id,
            user_id,
            token_hash: secret::hash(raw),
            lineage_id: lineage_root.unwrap_or(id),
            rotated_from_id,
            issued_at,
            expires_at: issued_at + self.ttl,
        }
    }
}
