//! In-memory content store for single-node development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_entity::lesson::{AssetStatus, AssetUpdate, LessonAsset};

use super::store::ContentStore;

/// Content store keeping lessons in a map behind one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    lessons: Arc<RwLock<HashMap<Uuid, LessonAsset>>>,
}

impl MemoryContentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lesson. Upload ids are unique.
    pub async fn insert(&self, lesson: LessonAsset) -> AppResult<()> {
        let mut lessons = self.lessons.write().await;
        if lessons.values().any(|l| l.upload_id == lesson.upload_id) {
            return Err(AppError::conflict(format!(
                "Upload already linked to a lesson: {}",
                lesson.upload_id
            )));
        }
        lessons.insert(lesson.id, lesson);
        Ok(())
    }

    /// Current copy of a lesson.
    pub async fn get(&self, id: Uuid) -> Option<LessonAsset> {
        self.lessons.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn get_lesson_by_upload_id(&self, upload_id: &str) -> AppResult<Option<LessonAsset>> {
        Ok(self
            .lessons
            .read()
            .await
            .values()
            .find(|l| l.upload_id == upload_id)
            .cloned())
    }

    async fn get_lesson_by_asset_id(&self, asset_id: &str) -> AppResult<Option<LessonAsset>> {
        Ok(self
            .lessons
            .read()
            .await
            .values()
            .find(|l| l.asset_id.as_deref() == Some(asset_id))
            .cloned())
    }

    async fn compare_and_set_status(
        &self,
        lesson_id: Uuid,
        expected: AssetStatus,
        update: &AssetUpdate,
    ) -> AppResult<bool> {
        let mut lessons = self.lessons.write().await;
        match lessons.get_mut(&lesson_id) {
            Some(lesson) if lesson.status == expected => {
                lesson.apply(update);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
