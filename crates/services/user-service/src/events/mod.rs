//! Outbound user lifecycle events.

mod events_client;
mod publisher;

pub use events_client::EventsClient;
pub use publisher::{EventPublisher, EventSink, QueuedEventPublisher};
