//! Error types for the mail crate.

use std::fmt;

/// Errors from mail delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The client was constructed without an API key.
    MissingApiKey,
    /// Delivery failed after exhausting all retry attempts.
    DeliveryFailed { attempts: u32, reason: String },
    /// The mail API rejected the request.
    Rejected { status: u16, body: String },
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "mail API key is required"),
            Self::DeliveryFailed { attempts, reason } => {
                write!(f, "failed to send email after {attempts} attempts: {reason}")
            }
            Self::Rejected { status, body } => {
                write!(f, "mail API rejected request with status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for MailError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_failed_display_mentions_attempts() {
        let err = MailError::DeliveryFailed {
            attempts: 3,
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("connection refused"));
    }
}
