//! Refresh token persistence trait.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_entity::token::{NewRefreshToken, RefreshToken};

/// Durable storage for ledger records.
///
/// Implementations must make [`rotate`](Self::rotate) atomic: of any number
/// of concurrent rotations of the same record, at most one returns `Some`.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new record.
    async fn insert(&self, token: NewRefreshToken) -> AppResult<RefreshToken>;

    /// Find a record by secret hash, whatever its state.
    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>>;

    /// Revoke one record. `false` if it was already revoked or absent.
    async fn revoke(&self, id: Uuid) -> AppResult<bool>;

    /// Revoke `old_id` and insert `next` as one unit.
    /// `None` if `old_id` was already revoked.
    async fn rotate(&self, old_id: Uuid, next: NewRefreshToken)
    -> AppResult<Option<RefreshToken>>;

    /// Revoke every unrevoked record of a lineage.
    async fn revoke_lineage(&self, lineage_id: Uuid) -> AppResult<u64>;

    /// Revoke every unrevoked record of a user.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}
