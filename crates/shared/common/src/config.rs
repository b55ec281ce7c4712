//! Shared configuration structures.

use std::env;
use std::time::Duration;

use domain::{TokenLifetime, DEFAULT_TOKEN_LIFETIME, MIN_JWT_SECRET_LENGTH};
use serde::{Deserialize, Serialize};
use tonic::transport::{Channel, Endpoint};

use crate::error::{AppError, AppResult};

/// Read an environment variable and parse it, falling back to `default`.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// gRPC client connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrpcClientConfig {
    /// Service endpoint URL (e.g., "http://localhost:50051")
    pub endpoint: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl GrpcClientConfig {
    /// Client config for `endpoint` with timeouts from
    /// `RPC_CONNECT_TIMEOUT_MS` / `RPC_REQUEST_TIMEOUT_MS`.
    pub fn from_env(endpoint: impl Into<String>) -> Self {
        let defaults = Self::default();
        Self {
            endpoint: endpoint.into(),
            connect_timeout_ms: env_or("RPC_CONNECT_TIMEOUT_MS", defaults.connect_timeout_ms),
            request_timeout_ms: env_or("RPC_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Build a channel that connects on first use. An unreachable peer
    /// fails the individual call with `Unavailable`.
    pub fn lazy_channel(&self) -> Result<Channel, tonic::transport::Error> {
        Ok(Endpoint::from_shared(self.endpoint.clone())?
            .connect_timeout(self.connect_timeout())
            .timeout(self.request_timeout())
            .connect_lazy())
    }
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50051".to_string(),
            connect_timeout_ms: 5000,
            request_timeout_ms: 30000,
        }
    }
}

/// JWT signing configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC secret, at least `MIN_JWT_SECRET_LENGTH` bytes
    pub secret: String,
    /// Token lifetime, echoed to clients as `expiresIn`
    pub lifetime: TokenLifetime,
}

// Don't expose the secret in debug output
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl JwtConfig {
    /// Check the secret length and parse the lifetime notation.
    pub fn new(secret: impl Into<String>, lifetime: &str) -> AppResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            secret,
            lifetime: lifetime.parse()?,
        })
    }

    /// Read `JWT_SECRET` (required) and `JWT_EXPIRES_IN` (default `1h`).
    pub fn from_env() -> AppResult<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::validation("JWT_SECRET must be set"))?;
        let lifetime =
            env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_LIFETIME.to_string());
        Self::new(secret, &lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("COMMON_TEST_UNSET_VARIABLE", 42u16), 42);
    }

    #[test]
    fn test_grpc_timeouts() {
        let config = GrpcClientConfig {
            endpoint: "http://localhost:1".to_string(),
            connect_timeout_ms: 250,
            request_timeout_ms: 1500,
        };
        assert_eq!(config.connect_timeout(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_jwt_config_rejects_short_secret() {
        assert!(matches!(
            JwtConfig::new("too-short", "1h"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_jwt_config_parses_lifetime() {
        let config = JwtConfig::new("0123456789abcdef0123456789abcdef", "15m").unwrap();
        assert_eq!(config.lifetime.seconds(), 900);
        assert_eq!(config.lifetime.as_str(), "15m");
        assert!(!format!("{:?}", config).contains("0123456789"));
    }

    #[test]
    fn test_jwt_config_rejects_bad_lifetime() {
        assert!(JwtConfig::new("0123456789abcdef0123456789abcdef", "soon").is_err());
    }
}
