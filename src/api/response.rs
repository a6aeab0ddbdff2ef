//! Response types for the payroll engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
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
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidAmount { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_AMOUNT",
                    "Invalid monetary amount",
                    message,
                ),
            },
            EngineError::InvalidComponent { component, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_COMPONENT",
                    format!("Invalid component '{}'", component),
                    message,
                ),
            },
            EngineError::InvalidStructure {
                structure_id,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_STRUCTURE",
                    format!("Invalid structure '{}'", structure_id),
                    message,
                ),
            },
            EngineError::InvalidInput { formula, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    format!("Invalid input to {}", formula),
                    message,
                ),
            },
            EngineError::InvalidTransition { from, action } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    "INVALID_TRANSITION",
                    format!("Cannot {} a payroll run in state {}", action, from),
                ),
            },
            EngineError::IncompleteRun { run_id, missing } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "INCOMPLETE_RUN",
                    format!("Payroll run {} is incomplete", run_id),
                    format!("{} roster entries unaccounted for", missing),
                ),
            },
            EngineError::StructureNotFound { structure_id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "STRUCTURE_NOT_FOUND",
                    format!("Structure not found: {}", structure_id),
                ),
            },
            EngineError::EmployeeNotAssigned { employee_id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "EMPLOYEE_NOT_ASSIGNED",
                    format!("Employee {} has no assigned pay structure", employee_id),
                ),
            },
            EngineError::StructureInUse {
                structure_id,
                assigned,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "STRUCTURE_IN_USE",
                    format!("Structure '{}' is still in use", structure_id),
                    format!("{} employee(s) are assigned to it", assigned),
                ),
            },
            EngineError::RunTimedOut {
                run_id,
                completed,
                expected,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "RUN_TIMED_OUT",
                    format!("Payroll run {} timed out", run_id),
                    format!("{} of {} results received", completed, expected),
                ),
            },
        }
    }
}
