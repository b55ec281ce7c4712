//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Email
// =============================================================================

/// Mail providers accepted at registration.
pub const ALLOWED_EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com", "hotmail.com"];

/// Check if a (lower-cased) domain is on the registration allow-list
pub fn is_allowed_email_domain(domain: &str) -> bool {
    ALLOWED_EMAIL_DOMAINS.contains(&domain)
}

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted
pub const MAX_PASSWORD_LENGTH: usize = 128;

// =============================================================================
// Authentication
// =============================================================================

/// Default token lifetime, in the same notation as `JWT_EXPIRES_IN`
pub const DEFAULT_TOKEN_LIFETIME: &str = "1h";

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// OAuth provider name stored for Google accounts
pub const PROVIDER_GOOGLE: &str = "google";

// =============================================================================
// Events
// =============================================================================

/// Topic name of the user-created notification
pub const USER_CREATED_TOPIC: &str = "UserCreated";
