//! Mailer that writes messages to the log instead of delivering them.
//!
//! Used when no mail transport is configured, matching a console email
//! backend: the message shows up in the server output.

use chatdesk_core::auth::mailer::Mailer;
use chatdesk_types::error::MailError;
use tracing::info;

pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }
}

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if to.trim().is_empty() {
            return Err(MailError::Delivery("recipient address is empty".to_string()));
        }
        info!(from = %self.from, to = %to, subject = %subject, body = %body, "Outgoing email");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_logs_and_succeeds() {
        let mailer = LogMailer::new("noreply@chatdesk.local");
        assert_eq!(mailer.from_address(), "noreply@chatdesk.local");
        assert!(mailer.send("ana@example.com", "Hi", "Body").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_recipient_fails() {
        let mailer = LogMailer::new("noreply@chatdesk.local");
        assert!(matches!(
            mailer.send(" ", "Hi", "Body").await,
            Err(MailError::Delivery(_))
        ));
    }
}
