//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;
use uuid::Uuid;

use coursehub_api::AppState;
use coursehub_auth::{
    MemoryCredentialStore, MemoryRefreshTokenStore, RefreshTokenLedger, SessionManager,
    TokenCodec,
};
use coursehub_cache::memory::MemoryCacheProvider;
use coursehub_core::config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, LoggingConfig, ServerConfig,
    WebhookConfig,
};
use coursehub_entity::lesson::LessonAsset;
use coursehub_entity::user::UserRole;
use coursehub_media::{AssetReconciler, MemoryContentStore, WebhookGateway};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const PASSWORD: &str = "correct horse battery staple";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Users the app authenticates against
    pub credentials: MemoryCredentialStore,
    /// Refresh-token records
    pub refresh_tokens: MemoryRefreshTokenStore,
    /// Lesson assets
    pub content: MemoryContentStore,
}

/// Status plus parsed JSON body (or `Null` for empty bodies).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        cache: CacheConfig::default(),
        auth: AuthConfig {
            jwt_secret: "integration-jwt-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 14,
            store_timeout_ms: 2000,
        },
        webhook: WebhookConfig {
            signing_secret: WEBHOOK_SECRET.to_string(),
            dedup_window_seconds: 600,
            timestamp_tolerance_seconds: 300,
            store_timeout_ms: 2000,
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application wired entirely in memory
    pub fn new() -> Self {
        let config = test_config();
        let credentials = MemoryCredentialStore::new();
        let refresh_tokens = MemoryRefreshTokenStore::new();
        let content = MemoryContentStore::new();
        let cache = Arc::new(MemoryCacheProvider::new(
            &config.cache.memory,
            config.cache.default_ttl_seconds,
        ));

        let ledger = Arc::new(RefreshTokenLedger::new(
            Arc::new(refresh_tokens.clone()),
            &config.auth,
        ));
        let session_manager = Arc::new(SessionManager::new(
            Arc::new(TokenCodec::new(&config.auth)),
            ledger,
            Arc::new(credentials.clone()),
            &config.auth,
        ));
        let reconciler = Arc::new(AssetReconciler::new(
            Arc::new(content.clone()),
            &config.webhook,
        ));
        let webhook_gateway = Arc::new(
            WebhookGateway::new(&config.webhook, cache.clone(), reconciler)
                .expect("Failed to build webhook gateway"),
        );

        let state = AppState {
            config: Arc::new(config),
            db: None,
            cache,
            session_manager,
            webhook_gateway,
        };

        Self {
            router: coursehub_api::build_router(state),
            credentials,
            refresh_tokens,
            content,
        }
    }

    /// Create a test user and return their ID
    pub async fn create_test_user(&self, email: &str) -> Uuid {
        self.credentials
            .add_user("Test Student", email, PASSWORD, UserRole::Student)
            .await
            .expect("Failed to create test user")
            .id
    }

    /// Create a pending lesson for `upload_id` and return its ID
    pub async fn create_lesson(&self, upload_id: &str) -> Uuid {
        let lesson = LessonAsset::pending("Lesson 1", upload_id);
        let id = lesson.id;
        self.content
            .insert(lesson)
            .await
            .expect("Failed to create lesson");
        id
    }

    /// Login and return the full token response body
    pub async fn login(&self, email: &str) -> Value {
        let response = self
            .post_json(
                "/auth/login",
                serde_json::json!({"email": email, "password": PASSWORD}),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body
    }

    pub async fn post_json(&self, path: &str, body: Value, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    /// POST raw bytes to the webhook endpoint under the given signature header.
    pub async fn post_webhook(
        &self,
        body: &[u8],
        signature: Option<(&str, String)>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri("/webhooks/mux")
            .header("Content-Type", "application/json");
        if let Some((name, value)) = signature {
            req = req.header(name, value);
        }
        self.send(req.body(Body::from(body.to_vec())).unwrap())
            .await
    }

    /// POST `event` signed with the shared secret at the current time.
    pub async fn deliver(&self, event: &Value) -> TestResponse {
        let body = event.to_string().into_bytes();
        let header = sign(WEBHOOK_SECRET, Utc::now().timestamp(), &body);
        self.post_webhook(&body, Some(("mux-signature", header)))
            .await
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }
}

/// `t=<ts>,v1=<hex hmac-sha256 over "<ts>." ++ body>`
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(body);
    let digest: String = mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    format!("t={timestamp},v1={digest}")
}

pub fn asset_event(event_id: &str, kind: &str, asset_id: &str, upload_id: &str) -> Value {
    serde_json::json!({
        "id": event_id,
        "type": kind,
        "data": {"id": asset_id, "upload_id": upload_id}
    })
}

pub fn upload_event(event_id: &str, kind: &str, upload_id: &str) -> Value {
    serde_json::json!({
        "id": event_id,
        "type": kind,
        "data": {"id": upload_id}
    })
}
