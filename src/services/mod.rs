//! Application services layer - Use cases and business logic.
//!
//! Services enforce domain rules and translate repository outcomes
//! into application-level results. They depend on abstractions
//! (traits) for dependency inversion.

mod user_service;

pub use user_service::{UserManager, UserService};
