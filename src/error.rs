//! Error types for the Attendance Engine.
//!
//! Every failure the engine can produce while recording punches or
//! building reports is a variant of [`EngineError`], a `thiserror` enum.

use chrono::NaiveDate;
use thiserror::Error;

use crate::punch::PunchAction;

/// The main error type for the Attendance Engine.
///
/// Every fallible operation in the crate returns this type, so callers
/// can match on one enum regardless of which layer failed.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::InvalidAction {
///     action: "teleport".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid action type: teleport");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The punch action string is not part of the punch vocabulary.
    #[error("Invalid action type: {action}")]
    InvalidAction {
        /// The unrecognized action as received from the caller.
        action: String,
    },

    /// The punch is not legal in the record's current state.
    ///
    /// Acknowledged no-ops (punching in while already in, starting a break
    /// while already on one) are successes and never produce this variant.
    #[error("Invalid punch for employee '{employee_id}' on {date}: {message}")]
    InvalidTransition {
        /// The employee whose record rejected the punch.
        employee_id: String,
        /// The attendance date of the record.
        date: NaiveDate,
        /// The action that was attempted.
        action: PunchAction,
        /// What made the punch illegal.
        message: String,
    },

    /// An optimistic write lost the race for the record.
    ///
    /// Callers may retry once with a freshly loaded record.
    #[error("Concurrent update for employee '{employee_id}' on {date}")]
    ConcurrencyConflict {
        /// The employee whose record was contended.
        employee_id: String,
        /// The attendance date of the contended record.
        date: NaiveDate,
    },

    /// The record store failed or did not answer within the deadline.
    #[error("Attendance store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the infrastructure failure.
        message: String,
    },

    /// A reporting period was outside the calendar.
    #[error("Invalid reporting period: year {year}, month {month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (must be 1-12).
        month: u32,
    },

    /// Policy file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Policy file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// Shorthand for results whose error side is [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
