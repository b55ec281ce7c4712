//! Authentication service - registration, login and token handling.
//!
//! User records live in the user service; this layer only orchestrates
//! calls to it and signs tokens.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::UserServiceClient;
use crate::service::token::{Claims, TokenIssuer};
use crate::validation::EmailDomainValidator;
use common::{AppError, AppResult, OptionExt};
use domain::{normalize_email, CreateUser, OAuthProfile, Password, User};

/// Signed token plus the account it was issued for.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    /// Configured lifetime notation (e.g. `1h`)
    pub expires_in: String,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new password account.
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Sign in with a provider profile, creating the account on first use
    async fn oauth_login(&self, profile: OAuthProfile) -> AppResult<AuthSession>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using gRPC client to user-service.
pub struct Authenticator {
    user_client: Arc<dyn UserServiceClient>,
    domains: EmailDomainValidator,
    tokens: TokenIssuer,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        user_client: Arc<dyn UserServiceClient>,
        domains: EmailDomainValidator,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            user_client,
            domains,
            tokens,
        }
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession {
            access_token: token.access_token,
            expires_in: token.expires_in,
            user,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<User> {
        let email = normalize_email(&email);

        if !self.domains.validate(&email).await {
            return Err(AppError::InvalidDomain);
        }

        if self.user_client.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        // A concurrent registration that wins the race comes back as Conflict
        let user = self
            .user_client
            .create(CreateUser::with_password(email, password, first_name, last_name))
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user = self.user_client.find_by_email(&normalize_email(&email)).await?;

        // Missing users and OAuth-only accounts still pay for a full verification
        let stored_hash = user.as_ref().and_then(|u| u.password_hash.clone());
        let password_valid = tokio::task::spawn_blocking(move || {
            Password::verify_stored(stored_hash.as_deref(), &password)
        })
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

        match user {
            Some(user) if password_valid => {
                info!(user_id = %user.id, "Login succeeded");
                self.session(user)
            }
            _ => {
                warn!("Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn oauth_login(&self, profile: OAuthProfile) -> AppResult<AuthSession> {
        let existing = self
            .user_client
            .find_oauth_user(&profile.provider, &profile.provider_id)
            .await?;

        let user = match existing {
            Some(user) => self
                .user_client
                .update(user.id, profile.refresh())
                .await?
                .ok_or_not_found()?,
            None => {
                let user = self.user_client.create(CreateUser::from(profile)).await?;
                info!(user_id = %user.id, provider = ?user.provider, "OAuth user created");
                user
            }
        };

        self.session(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
