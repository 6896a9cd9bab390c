//! Lesson asset entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::AssetStatus;

/// The video-asset attributes of a lesson record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonAsset {
    /// Lesson identifier.
    pub id: Uuid,
    /// Lesson title.
    pub title: String,
    /// Direct-upload identifier handed out when the upload URL was created.
    pub upload_id: String,
    /// Pipeline asset identifier, known once the asset exists.
    pub asset_id: Option<String>,
    /// Current playback readiness.
    pub status: AssetStatus,
    /// Public playback identifier, set when the asset becomes ready.
    pub playback_id: Option<String>,
    /// Asset duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Pipeline error text for errored assets.
    pub error_message: Option<String>,
    /// When the lesson was created.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl LessonAsset {
    /// Build a fresh `Pending` lesson for a newly issued upload.
    pub fn pending(title: impl Into<String>, upload_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            upload_id: upload_id.into(),
            asset_id: None,
            status: AssetStatus::Pending,
            playback_id: None,
            duration_seconds: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update in place. `None` fields keep their current value.
    pub fn apply(&mut self, update: &AssetUpdate) {
        self.status = update.status;
        if let Some(asset_id) = &update.asset_id {
            self.asset_id = Some(asset_id.clone());
        }
        if let Some(playback_id) = &update.playback_id {
            self.playback_id = Some(playback_id.clone());
        }
        if let Some(duration) = update.duration_seconds {
            self.duration_seconds = Some(duration);
        }
        if let Some(message) = &update.error_message {
            self.error_message = Some(message.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// The write half of a status transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetUpdate {
    /// Status to move to.
    pub status: AssetStatus,
    /// Asset id to bind, if the event carried one.
    pub asset_id: Option<String>,
    /// Playback id to bind.
    pub playback_id: Option<String>,
    /// Duration to record.
    pub duration_seconds: Option<f64>,
    /// Error text to record.
    pub error_message: Option<String>,
}

impl AssetUpdate {
    /// An update that only changes the status.
    pub fn status(status: AssetStatus) -> Self {
        Self {
            status,
            asset_id: None,
            playback_id: None,
            duration_seconds: None,
            error_message: None,
        }
    }
}
