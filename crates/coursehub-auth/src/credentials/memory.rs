//! In-memory credential store for single-node development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_entity::user::{User, UserRole};

use super::store::CredentialStore;
use crate::password::PasswordHasher;

/// Credential store keeping users in a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with a freshly hashed password.
    pub async fn add_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::conflict(format!("Email already registered: {email}")));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: PasswordHasher::new().hash_password(password)?,
            role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Removes a user.
    pub async fn remove_user(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
