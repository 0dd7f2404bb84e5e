//! User service - Handles user-related business logic.
//!
//! Validates inputs, delegates to the repository, and maps absence
//! into `NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::{validate_password_strength, CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user with a generated id and current timestamps
    async fn create_user(&self, data: CreateUser) -> AppResult<User>;

    /// Get user by id
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users (order unspecified)
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Total number of users
    async fn count_users(&self) -> AppResult<usize>;

    /// Apply a partial update to a user
    async fn update_user(&self, id: Uuid, patch: UpdateUser) -> AppResult<User>;

    /// Change only the email address of a user
    async fn update_email(&self, id: Uuid, email: String) -> AppResult<User>;

    /// Delete a user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of [`UserService`] over an injected repository
pub struct UserManager {
    repository: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    fn validate_create(data: &CreateUser) -> AppResult<()> {
        if !data.email.validate_email() {
            return Err(AppError::validation("Invalid email address"));
        }
        if data.first_name.trim().is_empty() {
            return Err(AppError::validation("First name is required"));
        }
        if data.last_name.trim().is_empty() {
            return Err(AppError::validation("Last name is required"));
        }
        validate_password_strength(&data.password).map_err(AppError::validation)?;
        Ok(())
    }

    fn validate_update(patch: &UpdateUser) -> AppResult<()> {
        if let Some(email) = &patch.email {
            if !email.validate_email() {
                return Err(AppError::validation("Invalid email address"));
            }
        }
        if let Some(first_name) = &patch.first_name {
            if first_name.trim().is_empty() {
                return Err(AppError::validation("First name cannot be empty"));
            }
        }
        if let Some(last_name) = &patch.last_name {
            if last_name.trim().is_empty() {
                return Err(AppError::validation("Last name cannot be empty"));
            }
        }
        if let Some(password) = &patch.password {
            validate_password_strength(password).map_err(AppError::validation)?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, data: CreateUser) -> AppResult<User> {
        tracing::info!(email = %data.email, "Creating user");
        Self::validate_create(&data)?;

        // Email uniqueness is enforced by the repository atomically
        // with the insert
        self.repository.insert(User::new(data)).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.repository.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.list().await
    }

    async fn count_users(&self) -> AppResult<usize> {
        self.repository.count().await
    }

    async fn update_user(&self, id: Uuid, patch: UpdateUser) -> AppResult<User> {
        tracing::info!(user_id = %id, "Updating user");
        Self::validate_update(&patch)?;
        self.repository.update(id, patch).await?.ok_or_not_found()
    }

    async fn update_email(&self, id: Uuid, email: String) -> AppResult<User> {
        self.update_user(id, UpdateUser::email_only(email)).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        tracing::info!(user_id = %id, "Deleting user");
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
