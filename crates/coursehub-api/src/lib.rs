//! # coursehub-api
//!
//! HTTP API layer for CourseHub built on Axum.
//!
//! Provides the auth and webhook endpoints, the bearer-token extractor,
//! request logging, DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_state;
pub use router::build_router;
pub use state::AppState;
