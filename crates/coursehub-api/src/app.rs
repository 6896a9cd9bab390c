//! Wires the PostgreSQL-backed stores into an [`AppState`].

use std::sync::Arc;

use tracing::info;

use coursehub_auth::{
    CredentialStore, RefreshTokenLedger, RefreshTokenStore, SessionManager, TokenCodec,
};
use coursehub_cache::CacheManager;
use coursehub_core::config::AppConfig;
use coursehub_core::result::AppResult;
use coursehub_core::traits::cache::CacheProvider;
use coursehub_database::DatabasePool;
use coursehub_database::repositories::{
    LessonAssetRepository, RefreshTokenRepository, UserRepository,
};
use coursehub_media::{AssetReconciler, ContentStore, WebhookGateway};

use crate::state::AppState;

/// Builds the production state: every store seam backed by PostgreSQL,
/// the dedup cache by the configured provider.
pub async fn build_state(config: AppConfig, db: DatabasePool) -> AppResult<AppState> {
    info!(provider = %config.cache.provider, "Initializing cache");
    let cache: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache).await?);

    let pool = db.pool().clone();
    let credentials: Arc<dyn CredentialStore> = Arc::new(UserRepository::new(pool.clone()));
    let refresh_tokens: Arc<dyn RefreshTokenStore> =
        Arc::new(RefreshTokenRepository::new(pool.clone()));
    let content: Arc<dyn ContentStore> = Arc::new(LessonAssetRepository::new(pool));

    let codec = Arc::new(TokenCodec::new(&config.auth));
    let ledger = Arc::new(RefreshTokenLedger::new(refresh_tokens, &config.auth));
    let session_manager = Arc::new(SessionManager::new(
        codec,
        ledger,
        credentials,
        &config.auth,
    ));

    let reconciler = Arc::new(AssetReconciler::new(content, &config.webhook));
    let webhook_gateway = Arc::new(WebhookGateway::new(
        &config.webhook,
        Arc::clone(&cache),
        reconciler,
    )?);

    Ok(AppState {
        config: Arc::new(config),
        db: Some(db),
        cache,
        session_manager,
        webhook_gateway,
    })
}
