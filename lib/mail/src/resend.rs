//! Resend HTTP API mail client.
//!
//! Delivery is attempted up to [`MAX_RETRIES`] times with a linear
//! backoff between attempts. In sandbox mode the message is logged
//! rather than delivered, so development environments never send real
//! mail.

use crate::client::Mailer;
use crate::error::MailError;
use crate::template::WelcomeEmail;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const MAX_RETRIES: u32 = 3;

/// Request body for the Resend send-email endpoint.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
}

/// Mail client backed by the Resend HTTP API.
pub struct ResendClient {
    from_email: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResendClient {
    /// Creates a new client.
    ///
    /// Sandboxed deployments never touch the Resend API, so the key may
    /// be empty there; set `require_key` where real delivery happens.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::MissingApiKey`] when `require_key` is set
    /// and `api_key` is empty.
    pub fn new(api_key: String, from_email: String, require_key: bool) -> Result<Self, MailError> {
        if require_key && api_key.is_empty() {
            return Err(MailError::MissingApiKey);
        }

        Ok(Self {
            from_email,
            api_key,
            client: reqwest::Client::new(),
        })
    }

    async fn send_once(&self, recipient: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let request = SendEmailRequest {
            from: &self.from_email,
            to: vec![recipient],
            subject: subject.to_string(),
            html: html.to_string(),
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::DeliveryFailed {
                attempts: 1,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl Mailer for ResendClient {
    async fn send_welcome(
        &self,
        recipient: &str,
        email: &WelcomeEmail,
        sandbox: bool,
    ) -> Result<(), MailError> {
        let subject = email.subject();
        let html = email.body_html();

        if sandbox {
            tracing::info!(
                recipient,
                subject,
                "sandbox mode, skipping mail delivery"
            );
            return Ok(());
        }

        let mut last_error = String::new();
        for attempt in 1..=MAX_RETRIES {
            match self.send_once(recipient, &subject, &html).await {
                Ok(()) => {
                    tracing::info!(recipient, attempt, "welcome email sent");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        recipient,
                        attempt,
                        max_attempts = MAX_RETRIES,
                        error = %e,
                        "failed to send welcome email"
                    );
                    last_error = e.to_string();
                    // Linear backoff between attempts
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                }
            }
        }

        Err(MailError::DeliveryFailed {
            attempts: MAX_RETRIES,
            reason: last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected_when_required() {
        let result = ResendClient::new(String::new(), "noreply@example.com".to_string(), true);
        assert!(matches!(result, Err(MailError::MissingApiKey)));
    }

    #[test]
    fn empty_api_key_is_fine_for_sandboxed_deployments() {
        let result = ResendClient::new(String::new(), "noreply@example.com".to_string(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn client_with_api_key_constructs() {
        let result =
            ResendClient::new("re_123".to_string(), "noreply@example.com".to_string(), true);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn sandbox_mode_skips_delivery() {
        let client =
            ResendClient::new("re_123".to_string(), "noreply@example.com".to_string(), true)
                .unwrap();
        let email = WelcomeEmail {
            username: "ada".to_string(),
            activation_url: "http://localhost:3000/confirm/tok".to_string(),
        };

        // No network access is attempted in sandbox mode.
        let result = client.send_welcome("ada@example.com", &email, true).await;
        assert!(result.is_ok());
    }
}
