use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::User;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new profile. Each profile owner has at most one profile.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_profile_owner(&self, profile_owner: &str) -> Result<Option<User>, AppError>;

    /// Points the user's current game at `game_id`
    async fn set_current_game(&self, user_id: &str, game_id: Option<&str>)
        -> Result<User, AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id)
            || users.values().any(|u| u.profile_owner == user.profile_owner)
        {
            warn!(profile_owner = %user.profile_owner, "Profile already exists");
            return Err(AppError::Conflict(format!(
                "Profile already exists for owner {}",
                user.profile_owner
            )));
        }

        users.insert(user.id.clone(), user.clone());
        debug!("User created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_profile_owner(&self, profile_owner: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.profile_owner == profile_owner)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn set_current_game(
        &self,
        user_id: &str,
        game_id: Option<&str>,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))?;

        user.game_id = game_id.map(str::to_string);
        Ok(user.clone())
    }
}
