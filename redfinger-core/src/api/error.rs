use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::Error;

pub const CONFLICT_MESSAGE: &str = "This redeem code has already been used!";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Everything a handler can fail with, rendered as `{ "error": "..." }`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error(transparent)]
    Service(#[from] Error),
}

impl ApiError {
    /// Status code and the one user-facing message for this error. Storage
    /// details never leave the process.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::MalformedPayload => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Service(Error::Validation(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Service(Error::Conflict(_)) => {
                (StatusCode::BAD_REQUEST, CONFLICT_MESSAGE.to_string())
            }
            ApiError::Service(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_ERROR_MESSAGE.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
