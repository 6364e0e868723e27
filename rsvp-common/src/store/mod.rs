//! Access to the hosted relational store
//!
//! The service only needs a handful of table operations, captured by the
//! [`Store`] trait. [`RestStore`] speaks the PostgREST dialect of the hosted
//! store; tests use the in-memory implementation in `crate::testing`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AvatarData, AvatarSelection, Guest, NewGuest, RsvpRecord};

mod rest;

pub use rest::RestStore;

/// Store client errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned status {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Table operations used by the RSVP service and the import tool
#[async_trait]
pub trait Store: Send + Sync {
    /// Whether the store has connection settings
    ///
    /// An unconfigured store makes the guest directory fall back to the
    /// built-in list and makes writes no-ops or errors depending on caller.
    fn is_configured(&self) -> bool {
        true
    }

    /// Create the `guests` table if missing
    async fn ensure_guests_table(&self) -> Result<(), StoreError>;

    /// All rows of the `guests` table
    async fn fetch_guests(&self) -> Result<Vec<Guest>, StoreError>;

    /// Insert one batch of guests
    async fn insert_guests(&self, batch: &[NewGuest]) -> Result<(), StoreError>;

    /// Insert an RSVP row
    async fn insert_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError>;

    /// Set `verified = true` on the most recent RSVP for `email`
    async fn mark_verified(&self, email: &str) -> Result<(), StoreError>;

    /// Most recent RSVP for `email`
    async fn latest_rsvp(&self, email: &str) -> Result<Option<RsvpRecord>, StoreError>;

    /// Replace the avatar list of the most recent RSVP for `email`
    async fn save_avatars(
        &self,
        email: &str,
        avatars: &[AvatarSelection],
    ) -> Result<(), StoreError>;

    /// Avatar lists of attending, verified RSVPs, oldest submission first
    async fn displayable_avatar_data(&self) -> Result<Vec<AvatarData>, StoreError>;
}
