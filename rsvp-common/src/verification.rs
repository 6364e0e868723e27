//! RSVP verification state machine
//!
//! A submission is classified against the guest directory before it is
//! stored. Only verified or unattending RSVPs get a confirmation email right
//! away; unverified ones wait for an admin to promote them.

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::matching::{find_guest, is_valid_email};
use crate::models::{Guest, RsvpRecord, RsvpSubmission};
use crate::store::Store;

/// Verification outcome of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpState {
    /// Not attending; no names to check
    Unattending,
    /// At least one attending guest is not on the list
    AttendingUnverified { unmatched: Vec<String> },
    AttendingVerified,
}

impl RsvpState {
    /// Value stored in the `verified` column, and whether the guest is
    /// confirmed without admin action
    ///
    /// Unattending RSVPs name no guests, so every named guest matched.
    pub fn is_verified(&self) -> bool {
        !matches!(self, Self::AttendingUnverified { .. })
    }
}

/// Reject submissions that cannot be classified
pub fn validate_submission(submission: &RsvpSubmission) -> Result<()> {
    if !is_valid_email(&submission.email) {
        return Err(Error::InvalidInput("Invalid email address".to_string()));
    }

    if submission.is_attending && submission.attending_guests.is_empty() {
        return Err(Error::InvalidInput(
            "At least one guest must be specified when attending".to_string(),
        ));
    }

    Ok(())
}

/// Match every attending guest against the directory
pub fn classify(submission: &RsvpSubmission, directory: &[Guest]) -> RsvpState {
    if !submission.is_attending {
        return RsvpState::Unattending;
    }

    let unmatched: Vec<String> = submission
        .attending_guests
        .iter()
        .filter(|name| find_guest(name, directory).is_none())
        .cloned()
        .collect();

    if unmatched.is_empty() {
        RsvpState::AttendingVerified
    } else {
        RsvpState::AttendingUnverified { unmatched }
    }
}

/// Row to insert for a classified submission, stamped with the current UTC time
pub fn to_record(submission: &RsvpSubmission, state: &RsvpState) -> RsvpRecord {
    let diet = submission.diet.trim();
    RsvpRecord {
        name: submission.name.trim().to_string(),
        email: submission.email.trim().to_string(),
        is_attending: submission.is_attending,
        attending_guests: submission.attending_guests.clone(),
        diet: (!diet.is_empty()).then(|| diet.to_string()),
        verified: state.is_verified(),
        submitted_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Result of checking an admin credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuth {
    Granted,
    /// No admin secret is configured, so nothing can be granted
    SecretUnset,
    Denied,
}

pub fn authorize_admin(provided: &str, configured: Option<&str>) -> AdminAuth {
    match configured {
        None => AdminAuth::SecretUnset,
        Some(secret) if provided == secret => AdminAuth::Granted,
        Some(_) => AdminAuth::Denied,
    }
}

/// Mark the most recent RSVP for `email` verified and read it back
///
/// Returns `None` when the update succeeded but no row could be read back,
/// in which case there is nobody to confirm.
pub async fn promote_rsvp(store: &dyn Store, email: &str) -> Result<Option<RsvpRecord>> {
    store.mark_verified(email).await?;
    info!(email = %email, "RSVP verified");

    match store.latest_rsvp(email).await {
        Ok(Some(mut record)) => {
            record.verified = true;
            Ok(Some(record))
        }
        Ok(None) => {
            warn!(email = %email, "No RSVP found after verification");
            Ok(None)
        }
        Err(e) => {
            warn!(email = %email, "Could not read back verified RSVP: {}", e);
            Ok(None)
        }
    }
}
