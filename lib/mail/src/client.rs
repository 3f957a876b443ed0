//! The mail delivery trait.

use crate::error::MailError;
use crate::template::WelcomeEmail;
use async_trait::async_trait;

/// Sends transactional mail.
///
/// Implementations decide delivery and retry mechanics. In sandbox mode
/// (non-production namespaces) implementations log the message instead
/// of delivering it.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the welcome/activation email to `recipient`.
    async fn send_welcome(
        &self,
        recipient: &str,
        email: &WelcomeEmail,
        sandbox: bool,
    ) -> Result<(), MailError>;
}
