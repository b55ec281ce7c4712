//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod oauth_handler;

pub use auth_handler::{auth_routes, protected_auth_routes};
pub use health_handler::health_routes;
pub use oauth_handler::oauth_routes;
