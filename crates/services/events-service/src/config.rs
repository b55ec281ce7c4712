//! Events service configuration.

use std::env;

/// Events service configuration.
#[derive(Debug, Clone)]
pub struct EventsServiceConfig {
    /// Sender address for outgoing mail
    pub mail_from: String,
}

impl EventsServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
        }
    }
}

impl Default for EventsServiceConfig {
    fn default() -> Self {
        Self {
            mail_from: "noreply@example.com".to_string(),
        }
    }
}
