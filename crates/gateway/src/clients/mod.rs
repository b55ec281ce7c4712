//! gRPC clients for calling microservices.

mod auth_client;

pub use auth_client::{AuthApi, AuthClient, Session, TokenClaims};
