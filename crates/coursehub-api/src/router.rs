//! Route definitions for the CourseHub HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .merge(auth_routes())
        .merge(webhook_routes())
        .route("/health", get(handlers::health::health))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: login, refresh, logout, logout-all, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
}

/// Video pipeline callbacks
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/mux", post(handlers::webhook::receive_mux))
}
