//! Fire-and-forget publishing of `UserCreated`.
//!
//! Events go into a bounded queue drained by one background task. Delivery
//! is at-most-once: a full queue or a failed delivery drops the event with
//! a warning, and the caller never waits on the events service.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use common::AppResult;
use domain::UserCreated;

/// Publisher handed to the user service.
pub trait EventPublisher: Send + Sync {
    /// Enqueue `event` and return immediately.
    fn publish(&self, event: UserCreated);
}

/// Destination the background task delivers to.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, event: UserCreated) -> AppResult<()>;
}

/// Bounded-queue publisher backed by a spawned delivery task.
#[derive(Clone)]
pub struct QueuedEventPublisher {
    tx: mpsc::Sender<UserCreated>,
}

impl QueuedEventPublisher {
    /// Spawn the delivery task on the current runtime.
    ///
    /// The task exits once every publisher handle has been dropped and the
    /// queue is drained.
    pub fn spawn(sink: Arc<dyn EventSink>, capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<UserCreated>(capacity.max(1));

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let user_id = event.id;
                match sink.deliver(event).await {
                    Ok(()) => debug!(%user_id, "UserCreated delivered"),
                    Err(e) => warn!(%user_id, error = %e, "UserCreated delivery failed, event dropped"),
                }
            }
            debug!("Event queue closed");
        });

        Self { tx }
    }
}

impl EventPublisher for QueuedEventPublisher {
    fn publish(&self, event: UserCreated) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(user_id = %event.id, "Event queue full, UserCreated dropped");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(user_id = %event.id, "Event queue closed, UserCreated dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use common::AppError;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn event(email: &str) -> UserCreated {
        UserCreated {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<String>>,
        notify: Notify,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        async fn deliver(&self, event: UserCreated) -> AppResult<()> {
            self.delivered.lock().unwrap().push(event.email);
            self.notify.notify_one();
            Ok(())
        }
    }

    /// Never completes a delivery.
    struct StalledSink;

    #[async_trait]
    impl EventSink for StalledSink {
        async fn deliver(&self, _event: UserCreated) -> AppResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        async fn deliver(&self, _event: UserCreated) -> AppResult<()> {
            Err(AppError::service_unavailable("events-service"))
        }
    }

    #[tokio::test]
    async fn test_events_are_delivered_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let publisher = QueuedEventPublisher::spawn(sink.clone(), 8);

        publisher.publish(event("a@gmail.com"));
        publisher.publish(event("b@gmail.com"));

        tokio::time::timeout(Duration::from_secs(1), async {
            while sink.delivered.lock().unwrap().len() < 2 {
                sink.notify.notified().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(
            *sink.delivered.lock().unwrap(),
            vec!["a@gmail.com".to_string(), "b@gmail.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let publisher = QueuedEventPublisher::spawn(Arc::new(StalledSink), 1);

        // One in flight, one queued, the rest dropped.
        for i in 0..10 {
            publisher.publish(event(&format!("user{}@gmail.com", i)));
            tokio::task::yield_now().await;
        }

        assert_eq!(publisher.tx.capacity(), 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_stop_the_queue() {
        let publisher = QueuedEventPublisher::spawn(Arc::new(FailingSink), 4);
        publisher.publish(event("a@gmail.com"));
        publisher.publish(event("b@gmail.com"));
        tokio::time::sleep(Duration::from_millis(20)).await;

        publisher.publish(event("c@gmail.com"));
        assert!(!publisher.tx.is_closed());
    }
}
