//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::ValidationError;
use crate::Error;

/// Body of every error response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error; each variant maps to one status code
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request fields (400)
    BadRequest(String),
    /// No row matched the id or filter (404)
    NotFound(String),
    /// Store failure (500); carries the client-facing message only
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Log a store failure and replace it with a generic `message`.
    ///
    /// For use with `map_err`: `.map_err(ApiError::store("Failed to retrieve runs."))`
    pub fn store(message: &'static str) -> impl FnOnce(Error) -> ApiError {
        move |err| {
            tracing::error!(error = %err, "{}", message);
            ApiError::Internal(message.to_string())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
