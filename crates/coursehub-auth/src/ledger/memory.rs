//! In-memory refresh token store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_entity::token::{NewRefreshToken, RefreshToken};

use super::store::RefreshTokenStore;

#[derive(Debug, Default)]
struct InnerState {
    records: HashMap<Uuid, RefreshToken>,
    by_hash: HashMap<String, Uuid>,
}

impl InnerState {
    /// Same uniqueness rules as the `refresh_tokens` indexes.
    fn insert(&mut self, token: NewRefreshToken) -> AppResult<RefreshToken> {
        if self.by_hash.contains_key(&token.token_hash) {
            return Err(AppError::conflict("Duplicate refresh token hash"));
        }
        let lineage_has_head = self
            .records
            .values()
            .any(|r| r.lineage_id == token.lineage_id && r.revoked_at.is_none());
        if lineage_has_head {
            return Err(AppError::conflict(
                "Lineage already has an unrevoked refresh token",
            ));
        }

        let record = token.into_record();
        self.by_hash.insert(record.token_hash.clone(), record.id);
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn revoke_where(&mut self, predicate: impl Fn(&RefreshToken) -> bool) -> u64 {
        let now = Utc::now();
        let mut count = 0;
        for record in self.records.values_mut() {
            if record.revoked_at.is_none() && predicate(record) {
                record.revoked_at = Some(now);
                count += 1;
            }
        }
        count
    }
}

/// Refresh token store kept in process memory.
///
/// One mutex guards all records, so rotation is trivially atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record in a lineage, oldest first.
    pub async fn lineage(&self, lineage_id: Uuid) -> Vec<RefreshToken> {
        let state = self.state.lock().await;
        let mut records: Vec<RefreshToken> = state
            .records
            .values()
            .filter(|r| r.lineage_id == lineage_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.issued_at);
        records
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn insert(&self, token: NewRefreshToken) -> AppResult<RefreshToken> {
        self.state.lock().await.insert(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        let state = self.state.lock().await;
        Ok(state
            .by_hash
            .get(token_hash)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.lock().await.revoke_where(|r| r.id == id) > 0)
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        next: NewRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        let mut state = self.state.lock().await;
        if state.by_hash.contains_key(&next.token_hash) {
            return Err(AppError::conflict("Duplicate refresh token hash"));
        }
        if state.revoke_where(|r| r.id == old_id) == 0 {
            return Ok(None);
        }
        state.insert(next).map(Some)
    }

    async fn revoke_lineage(&self, lineage_id: Uuid) -> AppResult<u64> {
        Ok(self
            .state
            .lock()
            .await
            .revoke_where(|r| r.lineage_id == lineage_id))
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self
            .state
            .lock()
            .await
            .revoke_where(|r| r.user_id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_token(lineage_id: Option<Uuid>, hash: &str) -> NewRefreshToken {
        let id = Uuid::new_v4();
        NewRefreshToken {
            id,
            user_id: Uuid::nil(),
            token_hash: hash.to_string(),
            lineage_id: lineage_id.unwrap_or(id),
            rotated_from_id: None,
            issued_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(1),
        }
    }

    #[tokio::test]
    async fn test_second_head_in_lineage_rejected() {
        let store = MemoryRefreshTokenStore::new();
        let root = store.insert(new_token(None, "h1")).await.unwrap();
        let err = store
            .insert(new_token(Some(root.lineage_id), "h2"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, coursehub_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_rotate_twice_has_one_winner() {
        let store = MemoryRefreshTokenStore::new();
        let root = store.insert(new_token(None, "h1")).await.unwrap();

        let first = store
            .rotate(root.id, new_token(Some(root.lineage_id), "h2"))
            .await
            .unwrap();
        let second = store
            .rotate(root.id, new_token(Some(root.lineage_id), "h3"))
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.lineage(root.lineage_id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = MemoryRefreshTokenStore::new();
        let root = store.insert(new_token(None, "h1")).await.unwrap();
        assert!(store.revoke(root.id).await.unwrap());
        assert!(!store.revoke(root.id).await.unwrap());
        assert!(!store.revoke(Uuid::new_v4()).await.unwrap());
    }
}
