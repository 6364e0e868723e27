//! Guest name verification

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::INVALID_REQUEST_FORMAT;
use crate::notify::AdminNotice;
use crate::{ApiError, ApiResult, AppState};

const NOT_ON_LIST: &str =
    "Name not found on the guest list. Please check the spelling or contact us.";

#[derive(Debug, Deserialize)]
pub struct VerifyNameRequest {
    #[serde(default)]
    pub name: String,
}

/// Identity of a matched guest
#[derive(Debug, Serialize)]
pub struct GuestRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyNameResponse {
    pub success: bool,
    pub message: String,
    pub guest: GuestRef,
}

/// POST /api/verify-name
///
/// A miss queues an unlisted-guest notice for the admin and answers 404.
pub async fn verify_name(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<VerifyNameRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyNameResponse>> {
    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest(INVALID_REQUEST_FORMAT.to_string()))?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name cannot be empty".to_string()));
    }

    match state.directory.find(name).await? {
        Some(guest) => {
            info!("Guest found: {} (ID: {})", guest.name, guest.id);
            Ok(Json(VerifyNameResponse {
                success: true,
                message: "Guest found".to_string(),
                guest: GuestRef {
                    id: guest.id,
                    name: guest.name,
                },
            }))
        }
        None => {
            info!("Guest not found: {}", name);
            state.notifications.submit(AdminNotice::UnlistedGuest {
                name: name.to_string(),
                ip_address: client_ip(&headers, peer.map(|ConnectInfo(addr)| addr)),
                user_agent: header_value(&headers, "user-agent").unwrap_or_default(),
                at: Utc::now(),
            });
            Err(ApiError::NotFound(NOT_ON_LIST.to_string()))
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Client address, preferring the first `X-Forwarded-For` entry
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    header_value(headers, "x-forwarded-for")
        .and_then(|value| value.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn name_routes() -> Router<AppState> {
    Router::new().route("/api/verify-name", post(verify_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(peer)), "10.0.0.1");
        assert_eq!(client_ip(&headers, None), "unknown");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }
}
