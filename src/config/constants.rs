//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Application
// =============================================================================

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "users-api";

/// Service version reported by the health endpoint
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;
