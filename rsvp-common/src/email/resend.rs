//! Resend API client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{EmailError, EmailMessage, Mailer};
use crate::config::EmailConfig;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: String,
}

#[derive(Debug, Default, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

/// Resend-backed mailer
pub struct ResendMailer {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &EmailConfig, timeout: Duration) -> Result<Self, EmailError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmailError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: RESEND_API_URL.to_string(),
            api_key: config.api_key.clone(),
            from: format!("{} <{}>", config.from_name, config.from_email),
        })
    }

    /// Point the client at a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn log_to_console(&self, message: &EmailMessage) -> String {
        let rule = "=".repeat(72);
        info!("{rule}");
        info!("EMAIL (console mode - RESEND_API_KEY not configured)");
        info!("From: {}", self.from);
        info!("To: {}", message.to);
        info!("Subject: {}", message.subject);
        info!("{}", "-".repeat(72));
        for line in message.body.lines() {
            info!("{line}");
        }
        info!("{rule}");
        "console".to_string()
    }
}

/// HTML rendering of a plain-text body
fn html_body(text: &str) -> String {
    format!(
        "<div style='font-family: sans-serif;'>{}</div>",
        text.replace('\n', "<br>")
    )
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, EmailError> {
        let Some(api_key) = &self.api_key else {
            return Ok(self.log_to_console(message));
        };

        let payload = SendRequest {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.body,
            html: html_body(&message.body),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        if !status.is_success() {
            let parsed: SendResponse = serde_json::from_str(&body).unwrap_or_default();
            let reason = parsed
                .error
                .map(|e| e.message)
                .or(parsed.message)
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            return Err(EmailError::Api(status.as_u16(), reason));
        }

        let parsed: SendResponse =
            serde_json::from_str(&body).map_err(|e| EmailError::Parse(e.to_string()))?;
        let id = parsed.id.unwrap_or_default();

        info!(to = %message.to, id = %id, "Email sent");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> EmailConfig {
        EmailConfig {
            api_key: api_key.map(str::to_string),
            from_name: "Wedding".to_string(),
            from_email: "wedding@example.com".to_string(),
        }
    }

    #[test]
    fn test_html_body_converts_newlines() {
        assert_eq!(
            html_body("Dear Bob,\n\nSee you"),
            "<div style='font-family: sans-serif;'>Dear Bob,<br><br>See you</div>"
        );
    }

    #[test]
    fn test_from_header() {
        let mailer = ResendMailer::new(&config(None), Duration::from_secs(1)).unwrap();
        assert_eq!(mailer.from, "Wedding <wedding@example.com>");
    }

    #[tokio::test]
    async fn test_console_mode_without_api_key() {
        let mailer = ResendMailer::new(&config(None), Duration::from_secs(1))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/unreachable");

        let id = mailer
            .send(&EmailMessage {
                to: "guest@example.com".to_string(),
                subject: "Hello".to_string(),
                body: "Line one\nLine two".to_string(),
            })
            .await
            .expect("console mode never fails");

        assert_eq!(id, "console");
    }
}
