//! Refresh token ledger repository.
//!
//! Rows are only ever inserted or have `revoked_at` set. Rotation runs in a
//! single transaction so a lineage never has two unrevoked rows, which the
//! `idx_refresh_tokens_lineage_head` partial unique index also enforces.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::token::{NewRefreshToken, RefreshToken};

const INSERT_SQL: &str = "INSERT INTO refresh_tokens \
     (id, user_id, token_hash, lineage_id, rotated_from_id, issued_at, expires_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *";

/// Repository for the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new ledger record.
    pub async fn insert(&self, token: &NewRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(INSERT_SQL)
            .bind(token.id)
            .bind(token.user_id)
            .bind(&token.token_hash)
            .bind(token.lineage_id)
            .bind(token.rotated_from_id)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert refresh token", e)
            })
    }

    /// Find a record by the hash of its secret, revoked or not.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Set `revoked_at` if unset. Returns whether this call revoked it.
    pub async fn revoke(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh token", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every unrevoked record in a lineage.
    pub async fn revoke_lineage(&self, lineage_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() \
             WHERE lineage_id = $1 AND revoked_at IS NULL",
        )
        .bind(lineage_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke token lineage", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Revoke every unrevoked record owned by a user.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() \
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user tokens", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Revoke `old_id` and insert `next` in one transaction.
    ///
    /// Returns `None` when `old_id` was already revoked; the transaction is
    /// rolled back and nothing is inserted.
    pub async fn rotate(
        &self,
        old_id: Uuid,
        next: &NewRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin rotation", e)
        })?;

        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(old_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke rotated token", e)
        })?;

        if revoked.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back rotation", e)
            })?;
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, RefreshToken>(INSERT_SQL)
            .bind(next.id)
            .bind(next.user_id)
            .bind(&next.token_hash)
            .bind(next.lineage_id)
            .bind(next.rotated_from_id)
            .bind(next.issued_at)
            .bind(next.expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert rotated token", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit rotation", e)
        })?;

        Ok(Some(inserted))
    }
}
