//! Admin verification of unverified RSVPs
//!
//! The GET variant is the link in the admin notification email and renders
//! HTML. The POST variant takes a JSON body and answers JSON.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rsvp_common::verification::{authorize_admin, promote_rsvp, AdminAuth};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{pages, send_confirmation, StatusResponse, INVALID_REQUEST_FORMAT};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRsvpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_key: String,
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

/// Render a refusal as the HTML error page
fn error_html(err: ApiError) -> Response {
    let (status, message) = err.parts();
    (status, pages::error_page(&message)).into_response()
}

/// Check the admin key, promote the RSVP and confirm it to the guest
///
/// Returns the verified email address.
pub async fn verify(state: &AppState, request: VerifyRsvpRequest) -> ApiResult<String> {
    match authorize_admin(&request.api_key, state.config.admin_api_key.as_deref()) {
        AdminAuth::Granted => {}
        AdminAuth::SecretUnset => {
            error!("ADMIN_API_KEY not configured, refusing verification");
            return Err(ApiError::Internal("Server configuration error".to_string()));
        }
        AdminAuth::Denied => {
            warn!("Invalid API key provided for verification attempt");
            return Err(ApiError::Unauthorized("Invalid API key".to_string()));
        }
    }

    let email = request.email.trim().to_string();
    if email.is_empty() {
        return Err(bad_request("Email is required"));
    }

    if !state.store.is_configured() {
        error!("Store not configured, cannot verify RSVP");
        return Err(bad_request("Database not configured"));
    }

    match promote_rsvp(state.store.as_ref(), &email).await {
        Ok(Some(record)) => send_confirmation(&state.mailer, &record).await,
        Ok(None) => {}
        Err(e) => {
            error!(email = %email, "Failed to verify RSVP: {}", e);
            return Err(bad_request("Failed to update RSVP"));
        }
    }

    info!(email = %email, "RSVP verification complete");
    Ok(email)
}

/// GET /api/verify-rsvp?email=..&apiKey=..
pub async fn verify_rsvp_page(
    State(state): State<AppState>,
    query: Result<Query<VerifyRsvpRequest>, QueryRejection>,
) -> Response {
    let Ok(Query(request)) = query else {
        return error_html(bad_request(INVALID_REQUEST_FORMAT));
    };

    match verify(&state, request).await {
        Ok(email) => pages::verified_page(&email).into_response(),
        Err(err) => error_html(err),
    }
}

/// POST /api/verify-rsvp
pub async fn verify_rsvp_json(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRsvpRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return bad_request(INVALID_REQUEST_FORMAT).into_response();
    };

    match verify(&state, request).await {
        Ok(_) => Json(StatusResponse::ok("RSVP verified successfully")).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn verify_routes() -> Router<AppState> {
    Router::new().route(
        "/api/verify-rsvp",
        get(verify_rsvp_page).post(verify_rsvp_json),
    )
}
