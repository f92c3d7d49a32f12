//! Mailer trait definition.

use chatdesk_types::error::MailError;

/// Outbound email delivery.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), MailError>> + Send;
}
