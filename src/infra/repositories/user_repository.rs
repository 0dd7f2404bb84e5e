//! User repository - Data access over the record store.
//!
//! A thin pass-through layer between the service and the store. The
//! store already serializes access; the repository only translates
//! store signals into application errors.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{UpdateUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::store::RecordStore;

/// User repository trait for dependency injection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `Conflict` if the email is taken
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users (order unspecified)
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Apply a partial update; `Ok(None)` when the id is absent,
    /// `Conflict` when the patch claims a taken email
    async fn update(&self, id: Uuid, patch: UpdateUser) -> AppResult<Option<User>>;

    /// Delete a user; returns whether a record was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Total number of users
    async fn count(&self) -> AppResult<usize>;
}

/// Repository backed by the in-memory [`RecordStore`]
pub struct InMemoryUserRepository {
    store: Arc<RecordStore>,
}

impl InMemoryUserRepository {
    /// Create a repository over an injected store instance
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> AppResult<User> {
        self.store
            .insert(user.clone())
            .map_err(|taken| AppError::conflict(format!("User with email {}", taken.0)))?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.store.get(&id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.store.find_by_email(email))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.store.list_all())
    }

    async fn update(&self, id: Uuid, patch: UpdateUser) -> AppResult<Option<User>> {
        self.store
            .update(&id, patch)
            .map_err(|taken| AppError::conflict(format!("User with email {}", taken.0)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.store.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.store.len())
    }
}
