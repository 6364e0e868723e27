//! Background admin notifications
//!
//! Handlers hand notices to a bounded queue and return without waiting.
//! One worker task drains the queue, renders each notice and sends it to the
//! admin address. Delivery failures are logged and dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rsvp_common::email::templates;
use rsvp_common::email::{EmailMessage, Mailer};
use rsvp_common::models::RsvpRecord;
use rsvp_common::Config;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

/// Notices waiting for the worker before new ones are dropped
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 64;

/// Event worth telling the admin about
#[derive(Debug, Clone)]
pub enum AdminNotice {
    /// Someone tried a name that is not on the guest list
    UnlistedGuest {
        name: String,
        ip_address: String,
        user_agent: String,
        at: DateTime<Utc>,
    },
    /// An RSVP was stored unverified and needs admin review
    UnverifiedRsvp {
        record: RsvpRecord,
        unmatched: Vec<String>,
    },
}

/// What the worker needs from the service configuration
#[derive(Debug, Clone, Default)]
pub struct NotifySettings {
    pub admin_email: Option<String>,
    pub admin_api_key: Option<String>,
    pub public_base_url: String,
}

impl NotifySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_api_key: config.admin_api_key.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Email for a notice, or `None` when no admin address is configured
    pub fn render(&self, notice: &AdminNotice) -> Option<EmailMessage> {
        let admin_email = self.admin_email.as_deref()?;

        let message = match notice {
            AdminNotice::UnlistedGuest {
                name,
                ip_address,
                user_agent,
                at,
            } => templates::unlisted_guest_notice(admin_email, name, ip_address, user_agent, *at),
            AdminNotice::UnverifiedRsvp { record, unmatched } => {
                let link = templates::verification_link(
                    &self.public_base_url,
                    &record.email,
                    self.admin_api_key.as_deref(),
                );
                templates::unverified_rsvp_notice(admin_email, record, unmatched, link.as_deref())
            }
        };

        Some(message)
    }
}

/// Sending half of the notification queue
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<AdminNotice>,
}

impl NotificationQueue {
    /// Create the queue and spawn its worker on the current runtime
    pub fn start(mailer: Arc<dyn Mailer>, settings: NotifySettings) -> Self {
        let (tx, rx) = mpsc::channel(NOTIFICATION_QUEUE_CAPACITY);
        tokio::spawn(run_worker(rx, mailer, settings));
        Self { tx }
    }

    /// Queue a notice without waiting; a full queue drops it
    pub fn submit(&self, notice: AdminNotice) {
        match self.tx.try_send(notice) {
            Ok(()) => debug!("Admin notice queued"),
            Err(TrySendError::Full(notice)) => {
                warn!("Notification queue full, dropping notice: {:?}", notice);
            }
            Err(TrySendError::Closed(_)) => {
                error!("Notification worker stopped, dropping notice");
            }
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<AdminNotice>,
    mailer: Arc<dyn Mailer>,
    settings: NotifySettings,
) {
    while let Some(notice) = rx.recv().await {
        let Some(message) = settings.render(&notice) else {
            info!("ADMIN_EMAIL not configured, skipping admin notification");
            continue;
        };

        match mailer.send(&message).await {
            Ok(id) => info!(id = %id, subject = %message.subject, "Admin notification sent"),
            Err(e) => error!("Failed to send admin notification: {}", e),
        }
    }

    debug!("Notification worker exiting");
}
