//! Infrastructure layer - Storage concerns
//!
//! This module holds the in-memory record store and the repository
//! implementations built on top of it.

pub mod repositories;
pub mod store;

pub use repositories::{InMemoryUserRepository, UserRepository};
pub use store::{EmailTaken, RecordStore};
