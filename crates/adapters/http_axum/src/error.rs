//! HTTP error response mapping.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use devicestore_domain::error::{DeviceStoreError, ValidationError};

use crate::body;

/// Maps service failures and extractor rejections to HTTP responses.
///
/// - validation → 400 `{"error": ...}`
/// - not found → 404 `{"status": "Not Found"}`
/// - storage → 500 `{"error": ...}` carrying the underlying message
/// - unreadable body or query → 400 `{"error": ...}` with the parser's message
pub enum ApiError {
    Domain(DeviceStoreError),
    BadRequest(String),
}

impl From<DeviceStoreError> for ApiError {
    fn from(err: DeviceStoreError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Domain(DeviceStoreError::Validation(err)) => {
                body::error(StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(DeviceStoreError::NotFound(_)) => body::status_only(StatusCode::NOT_FOUND),
            Self::Domain(DeviceStoreError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                body::error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::BadRequest(message) => body::error(StatusCode::BAD_REQUEST, message),
        }
    }
}
