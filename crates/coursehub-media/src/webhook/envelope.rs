//! Decoding of the `{id, type, data}` event envelope.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use coursehub_entity::webhook::{WebhookEvent, WebhookEventKind};

use super::error::WebhookError;

#[derive(Debug, Deserialize)]
struct Envelope {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Parse an authenticated body into a typed event.
///
/// Asset events carry the asset id in `data.id` and the upload id in
/// `data.upload_id`; upload events carry the upload id in `data.id` and the
/// asset id, once known, in `data.asset_id`.
pub fn decode(body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| WebhookError::UnparseableBody(e.to_string()))?;
    let envelope = Envelope::deserialize(&raw)
        .map_err(|e| WebhookError::UnparseableBody(e.to_string()))?;

    if envelope.id.trim().is_empty() {
        return Err(WebhookError::UnparseableBody("empty event id".to_string()));
    }

    let kind = WebhookEventKind::from_wire(&envelope.kind)
        .ok_or_else(|| WebhookError::UnknownEventType(envelope.kind.clone()))?;

    let data = &envelope.data;
    let (upload_id, asset_id) = if kind.is_asset_event() {
        (string_at(data, "/upload_id"), string_at(data, "/id"))
    } else {
        (string_at(data, "/id"), string_at(data, "/asset_id"))
    };

    Ok(WebhookEvent {
        event_id: envelope.id,
        kind,
        upload_id,
        asset_id,
        playback_id: string_at(data, "/playback_ids/0/id"),
        duration_seconds: data.pointer("/duration").and_then(Value::as_f64),
        error_message: string_at(data, "/errors/messages/0"),
        received_at: Utc::now(),
        raw_payload: raw,
    })
}

fn string_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
