use serde::{Deserialize, Serialize};
use tracing::info;

/// One outbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Transport seam for alert delivery. The pipeline behaves identically
/// whether a real transport or the logging fallback sits behind it.
pub trait MailSender: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Fallback sender used when no transport is configured: messages are logged
/// so the service stays runnable locally without SMTP credentials.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

impl MailSender for LogMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "mail transport unconfigured; logging instead of sending"
        );
        Ok(())
    }
}
