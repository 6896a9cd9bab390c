//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use coursehub_auth::SessionManager;
use coursehub_core::config::AppConfig;
use coursehub_core::traits::cache::CacheProvider;
use coursehub_database::DatabasePool;
use coursehub_media::WebhookGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or pool handles, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool; absent when every store is in-memory
    pub db: Option<DatabasePool>,
    /// Cache provider (Redis or in-memory)
    pub cache: Arc<dyn CacheProvider>,
    /// Login, refresh and logout flows
    pub session_manager: Arc<SessionManager>,
    /// Inbound video-pipeline webhooks
    pub webhook_gateway: Arc<WebhookGateway>,
}
