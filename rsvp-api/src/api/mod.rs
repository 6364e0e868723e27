//! HTTP API handlers for rsvp-api
//!
//! All endpoints live under `/api` and answer JSON, except the GET variant of
//! RSVP verification which renders an HTML page for the admin's browser.

pub mod avatars;
pub mod health;
pub mod names;
pub mod pages;
pub mod rsvp;
pub mod verify;

use std::sync::Arc;

use rsvp_common::email::{templates, Mailer};
use rsvp_common::models::RsvpRecord;
use serde::Serialize;
use tracing::{error, info};

pub use avatars::avatar_routes;
pub use health::health_routes;
pub use names::name_routes;
pub use rsvp::rsvp_routes;
pub use verify::verify_routes;

/// Message for a request body that could not be decoded
pub const INVALID_REQUEST_FORMAT: &str = "Invalid request format";

/// Standard success body
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Send the guest their confirmation email
///
/// Failures are logged; the caller's request still succeeds.
pub(crate) async fn send_confirmation(mailer: &Arc<dyn Mailer>, record: &RsvpRecord) {
    let message = templates::confirmation(record);
    match mailer.send(&message).await {
        Ok(id) => info!(email = %record.email, id = %id, "Confirmation email sent"),
        Err(e) => error!(email = %record.email, "Failed to send confirmation email: {}", e),
    }
}
