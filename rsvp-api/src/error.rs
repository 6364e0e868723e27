//! Error types for rsvp-api
//!
//! Every JSON error body has the shape `{"success": false, "message": ...}`.
//! Upstream failures are logged here and answered with a fixed message so
//! store and provider details never reach the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message shown for any store or provider failure
pub const GENERIC_SERVER_ERROR: &str = "Server error - please try again";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Bad credential (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Name lookup miss (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server-side failure with a client-safe message (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// rsvp-common error
    #[error("Common error: {0}")]
    Common(#[from] rsvp_common::Error),
}

impl ApiError {
    /// Status code and client-facing message
    pub fn parts(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Common(rsvp_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Common(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_SERVER_ERROR.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Common(ref err) = self {
            if !matches!(err, rsvp_common::Error::InvalidInput(_)) {
                error!("Request failed: {}", err);
            }
        }

        let (status, message) = self.parts();
        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_common::store::StoreError;

    #[test]
    fn test_upstream_errors_are_generic() {
        let err = ApiError::from(rsvp_common::Error::DirectoryUnavailable(StoreError::Api(
            503,
            "secret internals".to_string(),
        )));
        let (status, message) = err.parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, GENERIC_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::from(rsvp_common::Error::InvalidInput(
            "Invalid email address".to_string(),
        ));
        assert_eq!(
            err.parts(),
            (StatusCode::BAD_REQUEST, "Invalid email address".to_string())
        );
    }

    #[test]
    fn test_bad_key_is_unauthorized() {
        let err = ApiError::Unauthorized("Invalid API key".to_string());
        assert_eq!(
            err.parts(),
            (StatusCode::UNAUTHORIZED, "Invalid API key".to_string())
        );
    }
}
