//! Auth Service Library
//!
//! This crate provides authentication functionality via gRPC.
//! It communicates with user-service to manage users and handles JWT tokens.

pub mod client;
pub mod config;
pub mod grpc;
pub mod service;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use domain::Password;
use tonic::transport::Server;
use tracing::info;

use crate::client::UserClient;
use crate::config::AuthServiceConfig;
use crate::grpc::AuthGrpcService;
use crate::service::{Authenticator, TokenIssuer};
use crate::validation::{DnsMxLookup, EmailDomainValidator};

/// Run the auth service with peer endpoints from the environment.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(host, port, AuthServiceConfig::from_env()?).await
}

/// Run the auth service as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    user_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AuthServiceConfig::from_env()?;
    config.user_service.endpoint = format!("http://127.0.0.1:{}", user_port);

    run_server_with_config(host, port, config).await
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Failed logins for unknown accounts verify against this; build it up front
    tokio::task::spawn_blocking(Password::prepare_dummy_hash).await?;

    // Create gRPC client to user-service
    let user_client = UserClient::new(&config.user_service)?;

    // Create auth service
    let auth_service = Arc::new(Authenticator::new(
        Arc::new(user_client),
        EmailDomainValidator::new(Arc::new(DnsMxLookup::from_system_conf())),
        TokenIssuer::new(&config.jwt),
    ));

    // Create gRPC service
    let grpc_service = AuthGrpcService::new(auth_service);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Auth service listening on {}", addr);

    // Run server
    Server::builder()
        .add_service(proto::AuthServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
