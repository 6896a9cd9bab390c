//! Content store trait.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_entity::lesson::{AssetStatus, AssetUpdate, LessonAsset};

/// Durable home of lesson asset records.
///
/// The reconciler is the only writer of `status`, and only through
/// [`compare_and_set_status`](Self::compare_and_set_status).
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Lesson whose direct upload has this id.
    async fn get_lesson_by_upload_id(&self, upload_id: &str) -> AppResult<Option<LessonAsset>>;

    /// Lesson bound to this pipeline asset.
    async fn get_lesson_by_asset_id(&self, asset_id: &str) -> AppResult<Option<LessonAsset>>;

    /// Apply `update` only if the lesson is still in `expected`.
    /// Returns `false` when the condition did not hold.
    async fn compare_and_set_status(
        &self,
        lesson_id: Uuid,
        expected: AssetStatus,
        update: &AssetUpdate,
    ) -> AppResult<bool>;
}
