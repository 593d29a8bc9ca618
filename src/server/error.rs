// ============================================================
// Layer 1 — HTTP Error Mapping
// ============================================================
// Every domain error becomes a status code plus a
// `{"detail": ...}` body:
//
//   Validation → 422   reason's message
//   NotFound   → 404   "Word '<w>' not found in vocabulary."
//   otherwise  → 500   generic message, full error logged

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::error::Error;

/// Message returned for any failure that is not the caller's fault.
pub const INTERNAL_DETAIL: &str = "An internal server error occurred.";

/// Body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// API error: a status code and a caller-facing message.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    /// Input was understood but has the wrong shape.
    #[must_use]
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(reason) => ApiError::unprocessable(reason.message()),
            Error::NotFound(_) => ApiError::not_found(err.to_string()),
            other => {
                tracing::error!("Query failed: {other}");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
