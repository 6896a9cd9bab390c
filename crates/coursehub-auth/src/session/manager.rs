//! Session lifecycle manager: login, refresh and logout flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use coursehub_core::config::AuthConfig;
use coursehub_core::deadline::within;
use coursehub_core::error::AppError;
use coursehub_entity::user::User;

use crate::INVALID_CREDENTIALS;
use crate::credentials::CredentialStore;
use crate::jwt::{AccessClaims, TokenCodec};
use crate::ledger::{IssuedRefreshToken, LedgerError, RefreshTokenLedger};

/// Tokens handed to the client after login or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    /// Signed access token.
    pub access_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Raw refresh secret. The previous one, if any, is now unusable.
    pub refresh_token: String,
    /// Refresh secret expiry.
    pub refresh_expires_at: DateTime<Utc>,
    /// Authenticated user.
    pub user_id: Uuid,
    /// Session lineage both tokens belong to.
    pub session_lineage_id: Uuid,
}

/// Orchestrates the token codec, refresh ledger and credential store.
///
/// Every rejection leaves this type as one `Authentication` error with the
/// same message; only transient store failures are distinguishable.
#[derive(Debug, Clone)]
pub struct SessionManager {
    codec: Arc<TokenCodec>,
    ledger: Arc<RefreshTokenLedger>,
    credentials: Arc<dyn CredentialStore>,
    store_timeout: Duration,
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        codec: Arc<TokenCodec>,
        ledger: Arc<RefreshTokenLedger>,
        credentials: Arc<dyn CredentialStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            codec,
            ledger,
            credentials,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
        }
    }

    /// Verifies credentials and starts a new session lineage.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, AppError> {
        let user = within(
            self.store_timeout,
            "credential verification",
            self.credentials.verify_password(email, password),
        )
        .await
        .map_err(|e| {
            if e.is_transient() {
                e
            } else {
                debug!(error = %e, "Login rejected");
                AppError::authentication(INVALID_CREDENTIALS)
            }
        })?;

        let refresh = self
            .ledger
            .issue(user.id, None)
            .await
            .map_err(|e| self.reject("login", e))?;

        let tokens = self.session_tokens(&user, refresh)?;
        info!(
            user_id = %user.id,
            session_lineage_id = %tokens.session_lineage_id,
            "Login successful"
        );
        Ok(tokens)
    }

    /// Exchanges a refresh secret for a new access token and a new secret.
    pub async fn refresh(&self, refresh_secret: &str) -> Result<SessionTokens, AppError> {
        let record = self
            .ledger
            .verify_and_consume(refresh_secret)
            .await
            .map_err(|e| self.reject("refresh", e))?;

        let user = within(
            self.store_timeout,
            "user lookup",
            self.credentials.find_user_by_id(record.user_id),
        )
        .await?;
        let Some(user) = user else {
            warn!(user_id = %record.user_id, "Refresh for a user that no longer exists");
            self.ledger
                .revoke_lineage(record.lineage_id)
                .await
                .map_err(|e| self.reject("refresh", e))?;
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        let next = self
            .ledger
            .rotate(&record)
            .await
            .map_err(|e| self.reject("refresh", e))?;

        let tokens = self.session_tokens(&user, next)?;
        info!(
            user_id = %user.id,
            session_lineage_id = %tokens.session_lineage_id,
            "Token refreshed"
        );
        Ok(tokens)
    }

    /// Revokes the presented refresh secret.
    ///
    /// Unknown, expired or already-revoked secrets count as logged out;
    /// only transient store failures are returned.
    pub async fn logout(&self, refresh_secret: &str) -> Result<(), AppError> {
        match self.ledger.verify_and_consume(refresh_secret).await {
            Ok(record) => {
                self.ledger.revoke(record.id).await?;
                info!(
                    user_id = %record.user_id,
                    session_lineage_id = %record.lineage_id,
                    "Logout completed"
                );
                Ok(())
            }
            Err(e) if e.is_transient() => Err(e.into()),
            Err(e) => {
                debug!(reason = %e, "Logout with unusable refresh token");
                Ok(())
            }
        }
    }

    /// Revokes every session of the user behind a verified access token.
    pub async fn logout_all(&self, claims: &AccessClaims) -> Result<u64, AppError> {
        Ok(self.ledger.revoke_all_for_user(claims.user_id()).await?)
    }

    /// Verifies an access token with the codec alone.
    pub fn authenticate(&self, access_token: &str) -> Result<AccessClaims, AppError> {
        self.codec.verify(access_token).map_err(|e| {
            debug!(reason = %e, "Access token rejected");
            AppError::from(e)
        })
    }

    fn session_tokens(
        &self,
        user: &User,
        refresh: IssuedRefreshToken,
    ) -> Result<SessionTokens, AppError> {
        let access = self
            .codec
            .issue(user.id, user.role, refresh.record.lineage_id)?;
        Ok(SessionTokens {
            access_token: access.token,
            access_expires_at: access.expires_at,
            refresh_token: refresh.secret,
            refresh_expires_at: refresh.record.expires_at,
            user_id: user.id,
            session_lineage_id: refresh.record.lineage_id,
        })
    }

    /// Collapse a ledger failure to the uniform rejection, keeping transient errors.
    fn reject(&self, operation: &'static str, err: LedgerError) -> AppError {
        match &err {
            LedgerError::AlreadyRevoked => {
                warn!(operation, "Concurrent refresh lost the rotation race");
            }
            LedgerError::ReuseDetected { user_id, lineage_id } => {
                warn!(
                    target: "coursehub::audit",
                    operation,
                    user_id = %user_id,
                    lineage_id = %lineage_id,
                    "Rejected replayed refresh token"
                );
            }
            LedgerError::Store(e) if e.is_transient() => {
                warn!(operation, error = %e, "Ledger unavailable");
            }
            _ => debug!(operation, reason = %err, "Refresh token rejected"),
        }
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use coursehub_core::error::ErrorKind;
    use coursehub_core::result::AppResult;
    use coursehub_entity::user::UserRole;

    use crate::credentials::MemoryCredentialStore;
    use crate::ledger::MemoryRefreshTokenStore;

    const EMAIL: &str = "learner@example.com";
    const PASSWORD: &str = "s3cret-pass";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "session-test-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 14,
            store_timeout_ms: 200,
        }
    }

    async fn manager() -> (SessionManager, MemoryCredentialStore) {
        let credentials = MemoryCredentialStore::new();
        credentials
            .add_user("Learner", EMAIL, PASSWORD, UserRole::Student)
            .await
            .unwrap();
        let config = config();
        let ledger = RefreshTokenLedger::new(Arc::new(MemoryRefreshTokenStore::new()), &config);
        let manager = SessionManager::new(
            Arc::new(TokenCodec::new(&config)),
            Arc::new(ledger),
            Arc::new(credentials.clone()),
            &config,
        );
        (manager, credentials)
    }

    fn assert_rejected(err: AppError) {
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        let (manager, _) = manager().await;
        let tokens = manager.login(EMAIL, PASSWORD).await.unwrap();

        let claims = manager.authenticate(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id(), tokens.user_id);
        assert_eq!(claims.session_lineage_id(), tokens.session_lineage_id);
        assert_eq!(claims.role, UserRole::Student);
        assert!(!tokens.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_bad_password() {
        let (manager, _) = manager().await;
        assert_rejected(manager.login(EMAIL, "wrong").await.unwrap_err());
        assert_rejected(manager.login("nobody@example.com", PASSWORD).await.unwrap_err());
    }

    #[tokio::test]
    async fn test_refresh_rotates_secret() {
        let (manager, _) = manager().await;
        let login = manager.login(EMAIL, PASSWORD).await.unwrap();
        let refreshed = manager.refresh(&login.refresh_token).await.unwrap();

        assert_ne!(refreshed.refresh_token, login.refresh_token);
        assert_eq!(refreshed.session_lineage_id, login.session_lineage_id);
        assert_rejected(manager.refresh(&login.refresh_token).await.unwrap_err());
    }

    #[tokio::test]
    async fn test_replay_kills_the_lineage() {
        let (manager, _) = manager().await;
        let t0 = manager.login(EMAIL, PASSWORD).await.unwrap();
        let t1 = manager.refresh(&t0.refresh_token).await.unwrap();

        assert_rejected(manager.refresh(&t0.refresh_token).await.unwrap_err());
        assert_rejected(manager.refresh(&t1.refresh_token).await.unwrap_err());
    }

    #[tokio::test]
    async fn test_replay_leaves_other_sessions_alone() {
        let (manager, _) = manager().await;
        let stolen = manager.login(EMAIL, PASSWORD).await.unwrap();
        let other = manager.login(EMAIL, PASSWORD).await.unwrap();
        manager.refresh(&stolen.refresh_token).await.unwrap();

        assert!(manager.refresh(&stolen.refresh_token).await.is_err());
        assert!(manager.refresh(&other.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (manager, _) = manager().await;
        let tokens = manager.login(EMAIL, PASSWORD).await.unwrap();

        manager.logout(&tokens.refresh_token).await.unwrap();
        manager.logout(&tokens.refresh_token).await.unwrap();
        manager.logout("never-issued").await.unwrap();
        assert_rejected(manager.refresh(&tokens.refresh_token).await.unwrap_err());
    }

    #[tokio::test]
    async fn test_logout_all_revokes_every_session() {
        let (manager, _) = manager().await;
        let a = manager.login(EMAIL, PASSWORD).await.unwrap();
        let b = manager.login(EMAIL, PASSWORD).await.unwrap();
        let claims = manager.authenticate(&a.access_token).unwrap();

        assert_eq!(manager.logout_all(&claims).await.unwrap(), 2);
        assert!(manager.refresh(&a.refresh_token).await.is_err());
        assert!(manager.refresh(&b.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_user() {
        let (manager, credentials) = manager().await;
        let tokens = manager.login(EMAIL, PASSWORD).await.unwrap();
        credentials.remove_user(tokens.user_id).await;

        assert_rejected(manager.refresh(&tokens.refresh_token).await.unwrap_err());
    }

    #[derive(Debug)]
    struct StalledCredentials;

    #[async_trait]
    impl CredentialStore for StalledCredentials {
        async fn find_user_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn find_user_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_timeout_is_transient_not_rejection() {
        let config = config();
        let manager = SessionManager::new(
            Arc::new(TokenCodec::new(&config)),
            Arc::new(RefreshTokenLedger::new(
                Arc::new(MemoryRefreshTokenStore::new()),
                &config,
            )),
            Arc::new(StalledCredentials),
            &config,
        );

        let err = manager.login(EMAIL, PASSWORD).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert!(err.is_transient());
    }
}
