use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{models::User, repository::UserRepository, types::CreateUserRequest};
use crate::shared::AppError;

const MAX_NAME_LENGTH: usize = 64;

/// Service for player profiles
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Creates a profile for `request.profile_owner`
    #[instrument(skip(self))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        let owner = request.profile_owner.trim();
        if owner.is_empty() {
            return Err(AppError::Validation(
                "profileOwner cannot be empty".to_string(),
            ));
        }

        let user = User::new(name.to_string(), owner.to_string());
        self.repository.create_user(&user).await?;

        info!(user_id = %user.id, name = %user.name, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))
    }

    /// Looks up the profile owned by `profile_owner`
    #[instrument(skip(self))]
    pub async fn find_by_profile_owner(&self, profile_owner: &str) -> Result<User, AppError> {
        debug!("Looking up profile by owner");
        self.repository
            .find_by_profile_owner(profile_owner)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No profile for owner: {}", profile_owner))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::repository::InMemoryUserRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn request(name: &str, owner: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            profile_owner: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_trims_name() {
        let service = service();
        let user = service.create_user(request("  Maija ", "owner-1")).await.unwrap();

        assert_eq!(user.name, "Maija");
        assert_eq!(user.game_id, None);
        assert_eq!(service.get_user(&user.id).await.unwrap(), user);
        assert_eq!(service.find_by_profile_owner("owner-1").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let service = service();

        assert!(matches!(
            service.create_user(request("", "owner")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_user(request("Maija", "   ")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.create_user(request(&"x".repeat(65), "owner")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_user("nobody").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.find_by_profile_owner("nobody").await,
            Err(AppError::NotFound(_))
        ));
    }
}
