//! Avatar selection and the plaza view

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rsvp_common::avatars::{aggregate_avatars, clean_selections, validate_selections};
use rsvp_common::models::{GuestAvatar, SaveAvatarsRequest};
use rsvp_common::store::StoreError;
use serde::Serialize;
use tracing::{error, info, warn};

use super::{StatusResponse, INVALID_REQUEST_FORMAT};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct AvatarsResponse {
    pub success: bool,
    pub avatars: Vec<GuestAvatar>,
}

impl AvatarsResponse {
    fn with(avatars: Vec<GuestAvatar>) -> Self {
        Self {
            success: true,
            avatars,
        }
    }
}

/// POST /api/save-avatars
///
/// Replaces the avatar list on the guest's most recent RSVP.
pub async fn save_avatars(
    State(state): State<AppState>,
    payload: Result<Json<SaveAvatarsRequest>, JsonRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest(INVALID_REQUEST_FORMAT.to_string()))?;

    validate_selections(&request.email, &request.avatars)?;

    if !state.store.is_configured() {
        error!("Store not configured, cannot save avatars");
        return Err(ApiError::Internal("Database connection failed".to_string()));
    }

    let email = request.email.trim();
    let avatars = clean_selections(request.avatars);
    if let Err(e) = state.store.save_avatars(email, &avatars).await {
        error!(email = %email, "Failed to save avatar selections: {}", e);
        return Err(ApiError::Internal(
            "Failed to save avatar selections".to_string(),
        ));
    }

    info!(email = %email, count = avatars.len(), "Avatar selections saved");
    Ok(Json(StatusResponse::ok("Avatar selections saved successfully")))
}

/// GET /api/get-avatars
///
/// Only attending, verified RSVPs are shown. Store rejections and undecodable
/// rows degrade to an empty plaza; an unreachable store is a 500.
pub async fn get_avatars(State(state): State<AppState>) -> Response {
    if !state.store.is_configured() {
        info!("Store not configured, returning empty avatar list");
        return Json(AvatarsResponse::with(Vec::new())).into_response();
    }

    match state.store.displayable_avatar_data().await {
        Ok(rows) => Json(AvatarsResponse::with(aggregate_avatars(&rows))).into_response(),
        Err(StoreError::Network(e)) => {
            error!("Error fetching RSVPs: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AvatarsResponse {
                    success: false,
                    avatars: Vec::new(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Could not read avatars, returning empty list: {}", e);
            Json(AvatarsResponse::with(Vec::new())).into_response()
        }
    }
}

pub fn avatar_routes() -> Router<AppState> {
    Router::new()
        .route("/api/save-avatars", post(save_avatars))
        .route("/api/get-avatars", get(get_avatars))
}
