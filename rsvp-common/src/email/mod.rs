//! Outbound email
//!
//! Messages are handed to a transactional email provider through the
//! [`Mailer`] trait. [`ResendMailer`] talks to the Resend HTTP API and falls
//! back to writing the message to the log when no API key is configured.

use async_trait::async_trait;
use thiserror::Error;

mod resend;
pub mod templates;

pub use resend::ResendMailer;

/// Email provider errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Email provider error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Plain-text email to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sends email, returning the provider's message id
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<String, EmailError>;
}
