//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC service definitions for:
//! - AuthService: registration, login, OAuth login, token verification
//! - UserService: user record lookups, creation and updates
//! - EventsService: one-way user lifecycle notifications

/// Authentication service definitions.
pub mod auth {
    tonic::include_proto!("auth");
}

/// User service definitions.
pub mod user {
    tonic::include_proto!("user");
}

/// Events service definitions.
pub mod events {
    tonic::include_proto!("events");
}

// Re-export commonly used items
pub use auth::auth_service_client::AuthServiceClient;
pub use auth::auth_service_server::{AuthService, AuthServiceServer};
pub use events::events_service_client::EventsServiceClient;
pub use events::events_service_server::{EventsService, EventsServiceServer};
pub use user::user_service_client::UserServiceClient;
pub use user::user_service_server::{UserService, UserServiceServer};
