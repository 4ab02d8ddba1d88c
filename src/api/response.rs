//! Response types for the scheduling API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The input field the message belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a missing or unreadable acting-profile header.
    pub fn missing_actor(header: &str) -> Self {
        Self::with_details(
            "MISSING_ACTOR",
            format!("missing or invalid {} header", header),
            "Every request must name the acting profile by its UUID",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs a body with a 400 status.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<SchedulerError> for ApiErrorResponse {
    fn from(error: SchedulerError) -> Self {
        match error {
            SchedulerError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError {
                    field,
                    ..ApiError::new("VALIDATION_ERROR", message)
                },
            },
            SchedulerError::PermissionDenied { message } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("PERMISSION_DENIED", message),
            },
            SchedulerError::NotFound { entity, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    format!("{} not found", entity),
                    format!("No {} with id '{}'", entity.to_lowercase(), id),
                ),
            },
            SchedulerError::Conflict { message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("CONFLICT", message),
            },
            SchedulerError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            SchedulerError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            SchedulerError::Storage { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_field() {
        let response: ApiErrorResponse =
            SchedulerError::field("assigned_to", "Mia Park would exceed 20 hours for this week.")
                .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
        assert_eq!(response.error.field.as_deref(), Some("assigned_to"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SchedulerError::permission("no"), StatusCode::FORBIDDEN),
            (SchedulerError::not_found("Shift", "1"), StatusCode::NOT_FOUND),
            (SchedulerError::conflict("taken"), StatusCode::CONFLICT),
            (
                SchedulerError::Storage {
                    message: "poisoned".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }

    #[test]
    fn test_optional_fields_omitted() {
        let json = serde_json::to_string(&ApiError::new("CONFLICT", "taken")).unwrap();
        assert_eq!(json, r#"{"code":"CONFLICT","message":"taken"}"#);
    }
}
