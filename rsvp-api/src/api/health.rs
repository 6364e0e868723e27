//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix seconds
    pub timestamp: i64,
    /// Guests in the directory, 0 when it cannot be loaded
    pub guests: usize,
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let guests = match state.directory.load().await {
        Ok(guests) => guests.len(),
        Err(e) => {
            warn!("Health check could not load guests: {}", e);
            0
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().timestamp(),
        guests,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}
