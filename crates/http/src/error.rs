//! Error handling for the folio HTTP layer.
//!
//! The catalog's wire contract fixes the error body shape to a plain
//! `{"message": ...}` object (validation failures additionally carry a
//! `details` array), so the mapping here stays deliberately flat.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Message-shaped response body used by both error responses and the
/// handful of confirmation replies the catalog sends.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        message: String,
    },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("precondition failed: {message}")]
    PreconditionFailed { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a precondition failed error
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation { details, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, Some(details))
            }
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::PreconditionFailed { message } => {
                (StatusCode::PRECONDITION_FAILED, message, None)
            }
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None),
        };

        tracing::error!(
            status_code = %status.as_u16(),
            message = %message,
            "Request error"
        );

        // In production, we might want to hide internal error details
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = match details {
            Some(details) => json!({ "message": message, "details": details }),
            None => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_validation_error() {
        let details = vec![serde_json::json!({"field": "genres", "error": "must not be empty"})];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation {
                details: d,
                message,
            } => {
                assert_eq!(d, details);
                assert_eq!(message, "Validation failed");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let error = AppError::bad_request("No such book exist!!");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_precondition_failed_maps_to_412() {
        let error = AppError::precondition_failed("etag mismatch");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("store connection failed");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let error = AppError::validation(vec![], "missing required fields");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
