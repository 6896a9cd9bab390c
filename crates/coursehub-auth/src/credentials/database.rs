//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_database::repositories::UserRepository;
use coursehub_entity::user::User;

use super::store::CredentialStore;

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_by_email(email).await
    }
}
