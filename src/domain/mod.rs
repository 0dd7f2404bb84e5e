//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod user;
pub mod validation;

pub use user::{CreateUser, UpdateUser, User, UserListResponse, UserResponse};
pub use validation::validate_password_strength;
