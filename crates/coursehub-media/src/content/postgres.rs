//! PostgreSQL-backed content store.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_database::repositories::LessonAssetRepository;
use coursehub_entity::lesson::{AssetStatus, AssetUpdate, LessonAsset};

use super::store::ContentStore;

#[async_trait]
impl ContentStore for LessonAssetRepository {
    async fn get_lesson_by_upload_id(&self, upload_id: &str) -> AppResult<Option<LessonAsset>> {
        self.find_by_upload_id(upload_id).await
    }

    async fn get_lesson_by_asset_id(&self, asset_id: &str) -> AppResult<Option<LessonAsset>> {
        self.find_by_asset_id(asset_id).await
    }

    async fn compare_and_set_status(
        &self,
        lesson_id: Uuid,
        expected: AssetStatus,
        update: &AssetUpdate,
    ) -> AppResult<bool> {
        LessonAssetRepository::compare_and_set_status(self, lesson_id, expected, update).await
    }
}
