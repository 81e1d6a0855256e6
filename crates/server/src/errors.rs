use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use service::employee::errors::{EmployeeError, FieldError, FieldErrorKind};

pub const MSG_MISSING_FIELDS: &str = "Please provide all required fields";
pub const MSG_VALIDATION_FAILED: &str = "Validation failed";
pub const MSG_EMAIL_TAKEN: &str = "Email already registered";
pub const MSG_INTERNAL: &str = "An unexpected error occurred.";

/// JSON error response: `{ success: false, error, message, errors? }`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    message: &'static str,
    errors: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message, errors: Vec::new() }
    }

    pub fn bad_request(message: &'static str, errors: Vec<FieldError>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message, errors }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.status.canonical_reason().unwrap_or("Error"),
            message: self.message,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<EmployeeError> for JsonApiError {
    fn from(e: EmployeeError) -> Self {
        match e {
            EmployeeError::Validation(errs) => {
                let message = if errs.has_missing() { MSG_MISSING_FIELDS } else { MSG_VALIDATION_FAILED };
                Self::bad_request(message, errs.errors().to_vec())
            }
            EmployeeError::Conflict => Self::new(StatusCode::CONFLICT, MSG_EMAIL_TAKEN),
            EmployeeError::Persistence(_) | EmployeeError::Hashing(_) => {
                // 内部细节只写日志，不返回给客户端
                error!(code = e.code(), error = %e, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        Self::bad_request(
            MSG_VALIDATION_FAILED,
            vec![FieldError {
                field: "body",
                message: "Request body must be a JSON object",
                kind: FieldErrorKind::Invalid,
            }],
        )
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
