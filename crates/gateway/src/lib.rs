//! API Gateway Library
//!
//! HTTP front door for the auth platform. Requests are translated to gRPC
//! calls on auth-service; Google sign-in is handled here.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod oauth;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::clients::AuthClient;
use crate::config::GatewayConfig;
use crate::oauth::{GoogleOAuth, OAuthProvider};
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway with peer endpoints from the environment.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_server_with_config(host, port, GatewayConfig::from_env()).await
}

/// Run the gateway as an embedded component (for combined binary).
pub async fn run_embedded(
    host: &str,
    port: u16,
    auth_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.auth_service.endpoint = format!("http://127.0.0.1:{}", auth_port);

    run_server_with_config(host, port, config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Create gRPC client
    let auth_client = Arc::new(AuthClient::new(&config.auth_service)?);

    let google = match config.google {
        Some(google) => Some(Arc::new(GoogleOAuth::new(google)) as Arc<dyn OAuthProvider>),
        None => {
            warn!("Google OAuth not configured; /auth/google routes will answer 503");
            None
        }
    };

    // Create app state
    let state = AppState::new(auth_client, google);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
