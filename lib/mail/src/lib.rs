//! Transactional mail delivery for the sandpiper platform.
//!
//! Provides the [`Mailer`] trait and a [`ResendClient`] implementation
//! backed by the Resend HTTP API, plus the welcome-email template sent
//! at registration.

pub mod client;
pub mod error;
pub mod resend;
pub mod template;

pub use client::Mailer;
pub use error::MailError;
pub use resend::ResendClient;
pub use template::WelcomeEmail;
