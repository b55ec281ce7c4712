//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Normalise an email for storage and lookup (trimmed, lower-cased).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Domain part of an email address, lower-cased.
pub fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// OAuth provider name (`google`, ...)
    pub provider: Option<String>,
    /// Provider-scoped account identifier
    pub provider_id: Option<String>,
    pub photo: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account can log in with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check if the account is linked to an OAuth identity
    pub fn has_oauth_identity(&self) -> bool {
        self.provider.is_some() && self.provider_id.is_some()
    }
}

/// User creation data transfer object.
///
/// The password is plain text; the user service hashes it before storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub photo: Option<String>,
    pub access_token: Option<String>,
}

impl CreateUser {
    /// Registration with email and password.
    pub fn with_password(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
            first_name,
            last_name,
            ..Default::default()
        }
    }

    /// Normalise the email and check the record invariants.
    ///
    /// A new record needs a password or a complete OAuth identity, and
    /// provider / provider id come as a pair.
    pub fn validated(mut self) -> DomainResult<Self> {
        self.email = normalize_email(&self.email);
        if email_domain(&self.email).is_none() {
            return Err(DomainError::validation("Invalid email address"));
        }

        match (&self.provider, &self.provider_id) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(DomainError::validation(
                    "provider and providerId must be supplied together",
                ));
            }
            _ => {}
        }

        if self.password.is_none() && self.provider.is_none() {
            return Err(DomainError::validation(
                "A password or an OAuth identity is required",
            ));
        }

        Ok(self)
    }
}

impl From<OAuthProfile> for CreateUser {
    fn from(profile: OAuthProfile) -> Self {
        Self {
            email: profile.email,
            password: None,
            first_name: profile.first_name,
            last_name: profile.last_name,
            provider: Some(profile.provider),
            provider_id: Some(profile.provider_id),
            photo: profile.photo,
            access_token: profile.access_token,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    /// Plain text; re-hashed by the user service
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub access_token: Option<String>,
}

impl UpdateUser {
    /// Check if the update carries no changes
    pub fn is_empty(&self) -> bool {
        self == &UpdateUser::default()
    }
}

/// Profile returned by an OAuth provider after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub provider: String,
    pub provider_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub access_token: Option<String>,
}

impl OAuthProfile {
    /// Profile fields refreshed on every repeat login.
    pub fn refresh(&self) -> UpdateUser {
        UpdateUser {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            photo: self.photo.clone(),
            access_token: self.access_token.clone(),
            ..Default::default()
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}
