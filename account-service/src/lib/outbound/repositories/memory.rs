use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local credential store keyed by username.
///
/// The uniqueness check and the insert share one write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        let key = user.username.as_str().to_string();
        if users.contains_key(&key) {
            return Err(UserError::UsernameAlreadyExists(key));
        }

        users.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.get(username.as_str()).cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        let current_key = users
            .iter()
            .find(|(_, existing)| existing.id == user.id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;

        let new_key = user.username.as_str().to_string();
        if new_key != current_key {
            if users.contains_key(&new_key) {
                return Err(UserError::UsernameAlreadyExists(new_key));
            }
            users.remove(&current_key);
        }

        users.insert(new_key, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;

        let before = users.len();
        users.retain(|_, user| user.id != *id);

        if users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
