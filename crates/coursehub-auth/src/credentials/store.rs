//! Credential store trait.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_entity::user::User;

use crate::password::PasswordHasher;

/// Persists user identity and role.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up a user by id.
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Resolve `email` and check `password` against the stored hash.
    ///
    /// An unknown email and a wrong password fail identically, and both
    /// pay for one Argon2 verification.
    async fn verify_password(&self, email: &str, password: &str) -> AppResult<User> {
        let hasher = PasswordHasher::new();
        let Some(user) = self.find_user_by_email(email).await? else {
            hasher.verify_dummy(password);
            return Err(AppError::authentication(crate::INVALID_CREDENTIALS));
        };

        if hasher.verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AppError::authentication(crate::INVALID_CREDENTIALS))
        }
    }
}
