//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{InMemoryUserRepository, RecordStore};
use crate::services::{UserManager, UserService};

/// Application state containing all services (DI container).
///
/// The record store is owned here and injected into the service,
/// never reached through a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
}

impl AppState {
    /// Create application state with a fresh in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(RecordStore::new()))
    }

    /// Create application state over an existing store instance.
    ///
    /// Useful for tests that want to inspect or pre-seed the store.
    pub fn with_store(store: Arc<RecordStore>) -> Self {
        let repository = Arc::new(InMemoryUserRepository::new(store));
        Self {
            user_service: Arc::new(UserManager::new(repository)),
        }
    }

    /// Create application state with a manually injected service.
    ///
    /// Useful for handler tests that stub out the service layer.
    pub fn with_service(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
