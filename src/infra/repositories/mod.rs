//! Repository traits and implementations.

mod user_repository;

pub use user_repository::{InMemoryUserRepository, UserRepository};

#[cfg(test)]
pub use user_repository::MockUserRepository;
