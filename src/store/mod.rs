//! The `AttendanceStore` trait and the in-memory backend.
//!
//! The trait is the engine's seam to the record store. Higher layers (the
//! service, the HTTP API) depend on this abstraction, not on any concrete
//! backend. [`MemoryStore`] is the reference implementation used by tests
//! and by embedders that need no external persistence.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::EngineError;
use crate::models::{AttendanceDay, Role, RosterEntry};

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored record's version no longer matches the caller's copy.
    #[error("version conflict for employee '{employee_id}' on {date}")]
    VersionConflict {
        /// The employee whose record was contended.
        employee_id: String,
        /// The attendance date of the contended record.
        date: NaiveDate,
    },

    /// The backend failed or is unreachable.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// A description of the backend failure.
        message: String,
    },
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::VersionConflict { employee_id, date } => {
                EngineError::ConcurrencyConflict { employee_id, date }
            }
            StoreError::Unavailable { message } => EngineError::StoreUnavailable { message },
        }
    }
}

/// Shorthand for results whose error side is [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// Abstraction over an attendance record store backend.
///
/// Backends own the uniqueness of the (employee, date) key and the
/// optimistic versioning of saves. All methods return `Send` futures so
/// the trait can be used in multi-threaded async runtimes.
pub trait AttendanceStore: Send + Sync + 'static {
    /// Retrieves one attendance record. Returns `None` if no punch has
    /// created it yet.
    fn find_day<'a>(
        &'a self,
        employee_id: &'a str,
        date: NaiveDate,
    ) -> impl Future<Output = StoreResult<Option<AttendanceDay>>> + Send + 'a;

    /// Persists a record optimistically and returns the stored copy with
    /// its bumped version.
    ///
    /// The save succeeds only when `day.version` matches the stored
    /// version; an absent record counts as version 0. A mismatch fails
    /// with [`StoreError::VersionConflict`] and changes nothing.
    fn save_day<'a>(
        &'a self,
        day: &'a AttendanceDay,
    ) -> impl Future<Output = StoreResult<AttendanceDay>> + Send + 'a;

    /// Returns records whose date lies in the inclusive `[start, end]`
    /// range, optionally narrowed to one employee. Order is unspecified.
    fn find_range<'a>(
        &'a self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<&'a str>,
    ) -> impl Future<Output = StoreResult<Vec<AttendanceDay>>> + Send + 'a;

    /// Returns every record, optionally narrowed to one employee. Order is
    /// unspecified.
    fn find_all<'a>(
        &'a self,
        employee_id: Option<&'a str>,
    ) -> impl Future<Output = StoreResult<Vec<AttendanceDay>>> + Send + 'a;

    /// Returns the employee directory, optionally narrowed to the given
    /// roles.
    fn list_employees<'a>(
        &'a self,
        roles: Option<&'a [Role]>,
    ) -> impl Future<Output = StoreResult<Vec<RosterEntry>>> + Send + 'a;
}
