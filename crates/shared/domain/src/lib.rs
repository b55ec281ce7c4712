//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared across microservices via the proto crate.

pub mod constants;
pub mod error;
pub mod events;
pub mod password;
pub mod token;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use events::UserCreated;
pub use password::Password;
pub use token::TokenLifetime;
pub use user::{
    email_domain, normalize_email, CreateUser, OAuthProfile, UpdateUser, User, UserResponse,
};
