//! gRPC clients for peer services.

mod user_client;

pub use user_client::{UserClient, UserServiceClient};
