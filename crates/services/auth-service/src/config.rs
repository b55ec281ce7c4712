//! Auth service configuration.

use std::env;

use common::{AppResult, GrpcClientConfig, JwtConfig};

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Token signing secret and lifetime
    pub jwt: JwtConfig,
    /// User service gRPC endpoint
    pub user_service: GrpcClientConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is missing or shorter than 32 characters,
    /// or `JWT_EXPIRES_IN` is not a valid lifetime.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            jwt: JwtConfig::from_env()?,
            user_service: GrpcClientConfig::from_env(
                env::var("USER_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:50052".to_string()),
            ),
        })
    }
}
