//! Domain validation rules shared between request DTOs and services.

use crate::config::MIN_PASSWORD_LENGTH;

/// Check password strength requirements.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters with one uppercase
/// letter, one lowercase letter, and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }
    Ok(())
}
