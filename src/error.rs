//! Typed errors and HTTP mapping.

use crate::accessor::AccessorError;
use crate::operation::Operation;
use crate::shape::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Schema loading problems and schema/accessor wiring defects. Never transient.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("invalid unique constraint {model}.{constraint}: {reason}")]
    InvalidUniqueConstraint {
        model: String,
        constraint: String,
        reason: String,
    },
    #[error("schema load: {0}")]
    Load(String),
    #[error("schema validation: {0}")]
    Validation(String),
    #[error("no data accessor registered for model '{model}'")]
    MissingAccessor { model: String },
    #[error("data accessor for model '{model}' does not implement {operation}")]
    MissingOperation { model: String, operation: Operation },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    /// Raised by the data accessor; never reinterpreted.
    #[error(transparent)]
    Accessor(#[from] AccessorError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("method not supported: {0}")]
    MethodNotSupported(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Caller mistake (4xx) as opposed to a server-side defect or accessor failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::MethodNotSupported(_)
                | AppError::BadRequest(_)
                | AppError::PayloadTooLarge(_)
        )
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Accessor(e) => match e {
                AccessorError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                AccessorError::UniqueViolation(_) => (StatusCode::CONFLICT, "conflict"),
                AccessorError::Unimplemented(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
                AccessorError::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "accessor_error"),
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::MethodNotSupported(_) => (StatusCode::METHOD_NOT_ALLOWED, "method_not_supported"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
        };
        let details = match &self {
            AppError::Validation(e) => serde_json::to_value(&e.issues).ok(),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
