//! Gateway configuration.

use std::env;

use common::GrpcClientConfig;

/// Google OAuth client registration.
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match a redirect URI registered with Google
    pub callback_url: String,
}

// Don't expose the client secret in debug output
impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

impl GoogleOAuthConfig {
    /// Read `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET` and
    /// `GOOGLE_CALLBACK_URL`; `None` unless all are set.
    pub fn from_env() -> Option<Self> {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            client_id: non_empty("GOOGLE_CLIENT_ID")?,
            client_secret: non_empty("GOOGLE_CLIENT_SECRET")?,
            callback_url: non_empty("GOOGLE_CALLBACK_URL")?,
        })
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Auth service gRPC endpoint
    pub auth_service: GrpcClientConfig,
    /// Google sign-in; OAuth routes answer 503 without it
    pub google: Option<GoogleOAuthConfig>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            auth_service: GrpcClientConfig::from_env(
                env::var("AUTH_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:50051".to_string()),
            ),
            google: GoogleOAuthConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_service: GrpcClientConfig::default(),
            google: None,
        }
    }
}
