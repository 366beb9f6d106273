//! JSON envelopes shared by every endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `{"status": "<reason phrase>"}`, used when there is nothing else to return.
#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

/// `{"error": "<message>"}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Respond with `status` and its canonical reason phrase as the body.
pub fn status_only(status: StatusCode) -> Response {
    let body = StatusBody {
        status: status.canonical_reason().unwrap_or_default(),
    };
    (status, Json(body)).into_response()
}

/// Respond with `status` and an error message.
pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    (status, Json(body)).into_response()
}
