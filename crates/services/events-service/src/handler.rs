//! `UserCreated` consumer.

use std::sync::Arc;

use tracing::{info, warn};

use domain::{UserCreated, USER_CREATED_TOPIC};

use crate::mailer::WelcomeMailer;

/// Reacts to new users. Failures are logged; the publisher is never told.
pub struct UserCreatedHandler {
    mailer: Arc<dyn WelcomeMailer>,
}

impl UserCreatedHandler {
    pub fn new(mailer: Arc<dyn WelcomeMailer>) -> Self {
        Self { mailer }
    }

    pub async fn handle(&self, event: UserCreated) {
        info!(topic = USER_CREATED_TOPIC, user_id = %event.id, email = %event.email, "Event received");

        if let Err(e) = self.mailer.send_welcome(&event).await {
            warn!(user_id = %event.id, error = %e, "Welcome mail failed");
        }
    }
}
