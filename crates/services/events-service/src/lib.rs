//! Events Service Library
//!
//! Consumes one-way user lifecycle notifications over gRPC.
//! It can be run as a standalone service or embedded in the combined binary.

pub mod config;
pub mod grpc;
pub mod handler;
pub mod mailer;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::config::EventsServiceConfig;
use crate::grpc::EventsGrpcService;
use crate::handler::UserCreatedHandler;
use crate::mailer::LoggingMailer;

/// Run the events service; it has no peers, so standalone and embedded
/// runs are the same.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = EventsServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run the gRPC server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: EventsServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mailer = Arc::new(LoggingMailer::new(config.mail_from));
    let handler = Arc::new(UserCreatedHandler::new(mailer));
    let grpc_service = EventsGrpcService::new(handler);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Events service listening on {}", addr);

    Server::builder()
        .add_service(proto::EventsServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
