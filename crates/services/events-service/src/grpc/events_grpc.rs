//! gRPC implementation for EventsService.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use domain::UserCreated;
use proto::events::{
    events_service_server::EventsService as EventsServiceProto, EventAck, UserCreatedEvent,
};

use crate::handler::UserCreatedHandler;

/// gRPC service wrapper for the event handlers.
pub struct EventsGrpcService {
    user_created: Arc<UserCreatedHandler>,
}

impl EventsGrpcService {
    pub fn new(user_created: Arc<UserCreatedHandler>) -> Self {
        Self { user_created }
    }
}

#[tonic::async_trait]
impl EventsServiceProto for EventsGrpcService {
    async fn user_created(
        &self,
        request: Request<UserCreatedEvent>,
    ) -> Result<Response<EventAck>, Status> {
        let req = request.into_inner();
        let id = Uuid::parse_str(&req.id)
            .map_err(|_| Status::invalid_argument("Invalid UUID format"))?;

        let event = UserCreated {
            id,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        };

        // Acknowledge receipt only; handling happens off the request path
        let handler = self.user_created.clone();
        tokio::spawn(async move { handler.handle(event).await });

        Ok(Response::new(EventAck {}))
    }
}
