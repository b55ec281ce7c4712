//! Welcome mail for new users.
//!
//! No SMTP transport is configured; `LoggingMailer` renders the message
//! and writes it to the log. A real transport implements `WelcomeMailer`.

use async_trait::async_trait;

use common::AppResult;
use domain::UserCreated;

/// Rendered email message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Welcome message for a freshly created user.
    pub fn welcome(from: impl Into<String>, user: &UserCreated) -> Self {
        let greeting = match user.first_name.as_deref() {
            Some(name) if !name.trim().is_empty() => format!("Hi {},", name.trim()),
            _ => "Hi,".to_string(),
        };

        Self {
            from: from.into(),
            to: user.email.clone(),
            subject: "Welcome aboard".to_string(),
            body: format!(
                "{}\n\nYour account for {} has been created.\n\nThanks for signing up!",
                greeting, user.email
            ),
        }
    }
}

/// Sends the welcome message for a `UserCreated` event.
#[async_trait]
pub trait WelcomeMailer: Send + Sync {
    async fn send_welcome(&self, user: &UserCreated) -> AppResult<()>;
}

/// Mailer that logs messages instead of sending them
pub struct LoggingMailer {
    from: String,
}

impl LoggingMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl WelcomeMailer for LoggingMailer {
    async fn send_welcome(&self, user: &UserCreated) -> AppResult<()> {
        let message = EmailMessage::welcome(self.from.clone(), user);

        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            message.from,
            message.to,
            message.subject,
            message.body
        );
        Ok(())
    }
}
