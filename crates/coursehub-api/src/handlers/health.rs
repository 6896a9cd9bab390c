//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db {
        Some(db) => Some(status_of(db.health_check().await)),
        None => None,
    };
    let cache = status_of(state.cache.health_check().await);

    let healthy = database.as_deref().is_none_or(|s| s == "connected") && cache == "connected";

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        cache,
    })
}

fn status_of<E>(result: Result<bool, E>) -> String {
    match result {
        Ok(true) => "connected",
        _ => "unavailable",
    }
    .to_string()
}
