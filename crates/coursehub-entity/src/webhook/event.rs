//! Decoded webhook events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of pipeline events this system understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventKind {
    /// `video.asset.created`
    AssetCreated,
    /// `video.asset.ready`
    AssetReady,
    /// `video.asset.errored`
    AssetErrored,
    /// `video.asset.deleted`
    AssetDeleted,
    /// `video.upload.created`
    UploadCreated,
    /// `video.upload.cancelled`
    UploadCancelled,
    /// `video.upload.errored`
    UploadErrored,
}

impl WebhookEventKind {
    /// Decode a wire `type` string. Unknown strings yield `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "video.asset.created" => Some(Self::AssetCreated),
            "video.asset.ready" => Some(Self::AssetReady),
            "video.asset.errored" => Some(Self::AssetErrored),
            "video.asset.deleted" => Some(Self::AssetDeleted),
            "video.upload.created" => Some(Self::UploadCreated),
            "video.upload.cancelled" => Some(Self::UploadCancelled),
            "video.upload.errored" => Some(Self::UploadErrored),
            _ => None,
        }
    }

    /// The wire `type` string.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::AssetCreated => "video.asset.created",
            Self::AssetReady => "video.asset.ready",
            Self::AssetErrored => "video.asset.errored",
            Self::AssetDeleted => "video.asset.deleted",
            Self::UploadCreated => "video.upload.created",
            Self::UploadCancelled => "video.upload.cancelled",
            Self::UploadErrored => "video.upload.errored",
        }
    }

    /// Whether `data.id` names an asset (as opposed to an upload).
    pub fn is_asset_event(&self) -> bool {
        matches!(
            self,
            Self::AssetCreated | Self::AssetReady | Self::AssetErrored | Self::AssetDeleted
        )
    }
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// An authenticated, decoded webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEvent {
    /// Source-assigned id, the deduplication key.
    pub event_id: String,
    /// Decoded event kind.
    pub kind: WebhookEventKind,
    /// Direct-upload id, if the payload names one.
    pub upload_id: Option<String>,
    /// Asset id, if known.
    pub asset_id: Option<String>,
    /// First playback id on ready assets.
    pub playback_id: Option<String>,
    /// Asset duration in seconds.
    pub duration_seconds: Option<f64>,
    /// First pipeline error message.
    pub error_message: Option<String>,
    /// When this process received the delivery.
    pub received_at: DateTime<Utc>,
    /// The parsed envelope as sent.
    pub raw_payload: serde_json::Value,
}
