use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::envelope::Envelope;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INTERNAL_ERROR: &str = "Something went wrong!";

/// One broken rule on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The only error type handlers and middleware return.
///
/// Rendering happens in `IntoResponse`, so handlers propagate with `?` and never
/// build error bodies themselves.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client payload broke one or more rules (400).
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// Request could not be interpreted at all (400).
    #[error("{0}")]
    BadRequest(String),

    /// Any fault from below the API layer (500).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => {
                tracing::debug!(violations = errors.len(), "request rejected by validation");
                Envelope::error(VALIDATION_FAILED, Some(json!({ "errors": errors })))
            }
            ApiError::BadRequest(message) => {
                tracing::debug!(%message, "bad request");
                Envelope::error(message, None)
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                Envelope::error(INTERNAL_ERROR, Some(json!({ "error": format!("{err:#}") })))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}
