//! Transition table.
//!
//! | Current           | Event           | Next      |
//! |-------------------|-----------------|-----------|
//! | Pending           | AssetCreated    | Created   |
//! | Pending           | AssetReady      | Ready     |
//! | Pending           | UploadErrored   | Errored   |
//! | Pending / Created | UploadCancelled | Cancelled |
//! | Created           | AssetReady      | Ready     |
//! | Created           | AssetErrored    | Errored   |
//!
//! Every other pair is a no-op. `UploadCreated` and `AssetDeleted` never
//! move a lesson, and Ready, Errored and Cancelled are sticky.

use coursehub_entity::lesson::{AssetStatus, AssetUpdate};
use coursehub_entity::webhook::{WebhookEvent, WebhookEventKind};

const ASSET_ERROR_FALLBACK: &str = "Asset processing failed";
const UPLOAD_ERROR_FALLBACK: &str = "Upload failed";

/// The write `event` causes for a lesson in `current`, if any.
pub fn plan(current: AssetStatus, event: &WebhookEvent) -> Option<AssetUpdate> {
    use AssetStatus::{Created, Pending};
    use WebhookEventKind as Kind;

    match (current, event.kind) {
        (Pending, Kind::AssetCreated) => Some(AssetUpdate {
            asset_id: event.asset_id.clone(),
            ..AssetUpdate::status(AssetStatus::Created)
        }),
        (Pending | Created, Kind::AssetReady) => Some(AssetUpdate {
            asset_id: event.asset_id.clone(),
            playback_id: event.playback_id.clone(),
            duration_seconds: event.duration_seconds,
            ..AssetUpdate::status(AssetStatus::Ready)
        }),
        (Created, Kind::AssetErrored) => Some(AssetUpdate {
            asset_id: event.asset_id.clone(),
            error_message: Some(
                event
                    .error_message
                    .clone()
                    .unwrap_or_else(|| ASSET_ERROR_FALLBACK.to_string()),
            ),
            ..AssetUpdate::status(AssetStatus::Errored)
        }),
        (Pending, Kind::UploadErrored) => Some(AssetUpdate {
            error_message: Some(
                event
                    .error_message
                    .clone()
                    .unwrap_or_else(|| UPLOAD_ERROR_FALLBACK.to_string()),
            ),
            ..AssetUpdate::status(AssetStatus::Errored)
        }),
        (Pending | Created, Kind::UploadCancelled) => {
            Some(AssetUpdate::status(AssetStatus::Cancelled))
        }
        _ => None,
    }
}
