//! Lesson asset repository.

use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::lesson::{AssetStatus, AssetUpdate, LessonAsset};

/// Repository for the `lesson_assets` table.
#[derive(Debug, Clone)]
pub struct LessonAssetRepository {
    pool: PgPool,
}

impl LessonAssetRepository {
    /// Create a new lesson asset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a lesson by its direct-upload id.
    pub async fn find_by_upload_id(&self, upload_id: &str) -> AppResult<Option<LessonAsset>> {
        sqlx::query_as::<_, LessonAsset>("SELECT * FROM lesson_assets WHERE upload_id = $1")
            .bind(upload_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find lesson by upload", e)
            })
    }

    /// Find a lesson by its pipeline asset id.
    pub async fn find_by_asset_id(&self, asset_id: &str) -> AppResult<Option<LessonAsset>> {
        sqlx::query_as::<_, LessonAsset>("SELECT * FROM lesson_assets WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find lesson by asset", e)
            })
    }

    /// Apply `update` only if the row is still in `expected`.
    ///
    /// Returns `false` when another writer moved the row first.
    pub async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: AssetStatus,
        update: &AssetUpdate,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE lesson_assets SET \
                 status = $3, \
                 asset_id = COALESCE($4, asset_id), \
                 playback_id = COALESCE($5, playback_id), \
                 duration_seconds = COALESCE($6, duration_seconds), \
                 error_message = COALESCE($7, error_message), \
                 updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(update.status)
        .bind(&update.asset_id)
        .bind(&update.playback_id)
        .bind(update.duration_seconds)
        .bind(&update.error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update lesson asset status", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
