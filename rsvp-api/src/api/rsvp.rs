//! RSVP submission

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rsvp_common::models::RsvpSubmission;
use rsvp_common::verification::{classify, to_record, validate_submission, RsvpState};
use tracing::{error, info, warn};

use super::{send_confirmation, StatusResponse, INVALID_REQUEST_FORMAT};
use crate::notify::AdminNotice;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/submit-rsvp
///
/// The RSVP is stored before any email goes out. A storage failure is logged
/// and the guest still gets their answer.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    payload: Result<Json<RsvpSubmission>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(submission) =
        payload.map_err(|_| ApiError::BadRequest(INVALID_REQUEST_FORMAT.to_string()))?;

    validate_submission(&submission)?;

    let rsvp_state = if submission.is_attending {
        let guests = state.directory.load().await?;
        classify(&submission, &guests)
    } else {
        RsvpState::Unattending
    };
    let record = to_record(&submission, &rsvp_state);

    if state.store.is_configured() {
        if let Err(e) = state.store.insert_rsvp(&record).await {
            error!(email = %record.email, "Failed to save RSVP: {}", e);
        }
    } else {
        warn!(
            email = %record.email,
            attending = record.is_attending,
            guests = ?record.attending_guests,
            "Store not configured, RSVP not saved"
        );
    }

    match rsvp_state {
        RsvpState::AttendingUnverified { unmatched } => {
            warn!(
                email = %record.email,
                unmatched = ?unmatched,
                "RSVP unverified, awaiting admin review"
            );
            state
                .notifications
                .submit(AdminNotice::UnverifiedRsvp { record, unmatched });
        }
        RsvpState::AttendingVerified => {
            send_confirmation(&state.mailer, &record).await;
            info!(
                "RSVP completed (ATTENDING): {} ({}) - Guests: {:?}",
                record.name, record.email, record.attending_guests
            );
        }
        RsvpState::Unattending => {
            send_confirmation(&state.mailer, &record).await;
            info!("RSVP completed (NOT ATTENDING): {} ({})", record.name, record.email);
        }
    }

    Ok(Json(StatusResponse::ok("RSVP submitted successfully")))
}

pub fn rsvp_routes() -> Router<AppState> {
    Router::new().route("/api/submit-rsvp", post(submit_rsvp))
}
