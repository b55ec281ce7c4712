//! gRPC client for the events service.

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::UserCreated;
use proto::events::UserCreatedEvent;
use proto::EventsServiceClient;

use super::EventSink;

/// Delivers events to the events service over gRPC.
#[derive(Clone)]
pub struct EventsClient {
    client: EventsServiceClient<Channel>,
}

impl EventsClient {
    /// Build a client whose channel connects on first delivery.
    pub fn new(config: &GrpcClientConfig) -> AppResult<Self> {
        let channel = config
            .lazy_channel()
            .map_err(|e| AppError::internal(format!("Invalid events service URL: {}", e)))?;
        debug!(endpoint = %config.endpoint, "Events service client configured");

        Ok(Self {
            client: EventsServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl EventSink for EventsClient {
    async fn deliver(&self, event: UserCreated) -> AppResult<()> {
        let request = UserCreatedEvent {
            id: event.id.to_string(),
            email: event.email,
            first_name: event.first_name,
            last_name: event.last_name,
        };

        self.client
            .clone()
            .user_created(request)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
