//! PostgreSQL-backed refresh token store.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_database::repositories::RefreshTokenRepository;
use coursehub_entity::token::{NewRefreshToken, RefreshToken};

use super::store::RefreshTokenStore;

#[async_trait]
impl RefreshTokenStore for RefreshTokenRepository {
    async fn insert(&self, token: NewRefreshToken) -> AppResult<RefreshToken> {
        RefreshTokenRepository::insert(self, &token).await
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        RefreshTokenRepository::find_by_hash(self, token_hash).await
    }

    async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        RefreshTokenRepository::revoke(self, id).await
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        next: NewRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        RefreshTokenRepository::rotate(self, old_id, &next).await
    }

    async fn revoke_lineage(&self, lineage_id: Uuid) -> AppResult<u64> {
        RefreshTokenRepository::revoke_lineage(self, lineage_id).await
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        RefreshTokenRepository::revoke_all_for_user(self, user_id).await
    }
}
