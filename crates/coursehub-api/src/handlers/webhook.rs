//! Inbound video-pipeline webhook handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::dto::response::WebhookResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Header names the signature is accepted under, in order of preference.
const SIGNATURE_HEADERS: [&str; 2] = ["mux-signature", "x-mux-signature"];

/// POST /webhooks/mux
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn receive_mux(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok());

    let status = state.webhook_gateway.process(&body, signature).await?;
    Ok(Json(WebhookResponse { status }))
}
