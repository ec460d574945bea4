//! Response types for the attendance API.
//!
//! This module defines the punch acknowledgment body, the error response
//! structures, and error handling for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::AttendanceDay;
use crate::punch::PunchOutcome;
use crate::service::PunchReceipt;

/// Whether a punch changed the record or merely acknowledged its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchStatus {
    /// The punch was recorded.
    Ok,
    /// The record was already in the requested state; nothing changed.
    AlreadyInState,
}

/// Response body for the `POST /punch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchResponse {
    /// Whether the punch mutated the record.
    pub status: PunchStatus,
    /// Human-readable acknowledgment.
    pub message: String,
    /// The attendance record after processing.
    pub record: AttendanceDay,
}

impl From<PunchReceipt> for PunchResponse {
    fn from(receipt: PunchReceipt) -> Self {
        let (status, message) = match receipt.outcome {
            PunchOutcome::Recorded => (PunchStatus::Ok, "Punch action successful"),
            PunchOutcome::AlreadyPunchedIn => (PunchStatus::AlreadyInState, "Already punched in."),
            PunchOutcome::AlreadyOnBreak => (PunchStatus::AlreadyInState, "Already on break."),
        };
        Self {
            status,
            message: message.to_string(),
            record: receipt.record,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable machine-readable code, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Message suitable for showing to the caller.
    pub message: String,
    /// Extra context, omitted from the body when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Builds an error body from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Builds an error body carrying a details string.
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

    /// Shorthand for a `VALIDATION_ERROR` body.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Shorthand for a `MALFORMED_JSON` body.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates the response for a caller without identity headers.
    pub fn unauthenticated() -> Self {
        Self::new("UNAUTHENTICATED", "Caller identity headers are missing")
    }

    /// Creates the response for a caller reaching past their own records.
    pub fn access_denied() -> Self {
        Self::new("ACCESS_DENIED", "Access denied.")
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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidAction { action } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_ACTION",
                    "Invalid action type.",
                    format!("Unrecognized punch action '{}'", action),
                ),
            },
            EngineError::InvalidTransition {
                employee_id,
                date,
                action,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_TRANSITION",
                    message,
                    format!(
                        "Rejected '{}' for employee '{}' on {}",
                        action, employee_id, date
                    ),
                ),
            },
            EngineError::ConcurrencyConflict { employee_id, date } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "CONCURRENCY_CONFLICT",
                    "The attendance record was updated concurrently",
                    format!("employee '{}' on {}", employee_id, date),
                ),
            },
            EngineError::StoreUnavailable { message } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORE_UNAVAILABLE",
                    "Attendance store unavailable",
                    message,
                ),
            },
            EngineError::InvalidPeriod { year, month } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid reporting period: year {}, month {}", year, month),
                    "Valid month (1-12) and year are required.",
                ),
            },
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
        }
    }
}
