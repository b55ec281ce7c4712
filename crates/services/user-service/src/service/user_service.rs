//! User service - Handles user-record business logic.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{email_domain, normalize_email, CreateUser, Password, UpdateUser, User, UserCreated};

use crate::events::EventPublisher;
use crate::repository::{NewUserRecord, UserChanges, UserRepository};

/// User service trait for dependency injection.
///
/// Lookups take normalised input and return `None` when nothing matches.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user and announce it with `UserCreated`.
    ///
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Get user by OAuth provider identity
    async fn find_by_provider(&self, provider: &str, provider_id: &str) -> AppResult<Option<User>>;

    /// Get user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Merge `changes` into the user, `None` if the ID is unknown
    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    events: Arc<dyn EventPublisher>,
}

impl UserManager {
    /// Create new user service instance with repository and event publisher
    pub fn new(repo: Arc<dyn UserRepository>, events: Arc<dyn EventPublisher>) -> Self {
        Self { repo, events }
    }
}

/// Hash on the blocking pool; argon2 is CPU bound.
async fn hash_password(plain: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || Password::new(&plain).map(Password::into_string))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let input = input.validated()?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = match input.password {
            Some(plain) => Some(hash_password(plain).await?),
            None => None,
        };

        let user = self
            .repo
            .create(NewUserRecord {
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                provider: input.provider,
                provider_id: input.provider_id,
                photo: input.photo,
                access_token: input.access_token,
            })
            .await?;

        info!(user_id = %user.id, provider = ?user.provider, "User created");
        self.events.publish(UserCreated::from(&user));

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(&normalize_email(email)).await
    }

    async fn find_by_provider(&self, provider: &str, provider_id: &str) -> AppResult<Option<User>> {
        self.repo.find_by_provider(provider, provider_id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn update_user(&self, id: Uuid, changes: UpdateUser) -> AppResult<Option<User>> {
        if changes.is_empty() {
            return self.repo.find_by_id(id).await;
        }

        let email = match changes.email {
            Some(email) => {
                let email = normalize_email(&email);
                if email_domain(&email).is_none() {
                    return Err(AppError::validation("Invalid email address"));
                }
                if let Some(owner) = self.repo.find_by_email(&email).await? {
                    if owner.id != id {
                        return Err(AppError::conflict("User"));
                    }
                }
                Some(email)
            }
            None => None,
        };

        let password_hash = match changes.password {
            Some(plain) => Some(hash_password(plain).await?),
            None => None,
        };

        self.repo
            .update(
                id,
                UserChanges {
                    email,
                    password_hash,
                    first_name: changes.first_name,
                    last_name: changes.last_name,
                    photo: changes.photo,
                    access_token: changes.access_token,
                },
            )
            .await
    }
}
