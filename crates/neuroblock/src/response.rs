//! JSON error responses.
//!
//! Every failure is `{"error": {"kind": "...", "message": "..."}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::llm::{ErrorKind, GenerateError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

pub fn error(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            kind: kind.to_string(),
            message: message.into(),
        },
    };
    (status, Json(body)).into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, "bad_request", message)
}

pub fn unauthorized(message: impl Into<String>) -> Response {
    error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn forbidden(message: impl Into<String>) -> Response {
    error(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn internal_error(message: impl Into<String>) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::EmptyPrompt => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidProvider => StatusCode::NOT_FOUND,
        ErrorKind::NoCredential | ErrorKind::DecryptionFailed => StatusCode::PRECONDITION_FAILED,
        ErrorKind::ProviderError => StatusCode::BAD_GATEWAY,
        ErrorKind::NetworkError => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Map a generation failure to its status and body.
pub fn generate_error(err: &GenerateError) -> Response {
    let kind = err.kind();
    error(status_for(kind), kind.as_str(), err.to_string())
}
