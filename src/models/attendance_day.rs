//! Attendance day model.
//!
//! This module defines the AttendanceDay record, the unit of storage and
//! reporting: one record per employee per calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::session::SessionLog;

/// Presence status of an attendance day.
///
/// A day starts `Absent` and flips to `Present` on the first successful
/// work punch-in. It never reverts within the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No work punch-in has been recorded for the day.
    #[default]
    Absent,
    /// At least one work punch-in has been recorded.
    Present,
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayStatus::Absent => write!(f, "absent"),
            DayStatus::Present => write!(f, "present"),
        }
    }
}

/// One employee's attendance record for one calendar date.
///
/// Records are created lazily on the first punch of a day and then mutated
/// by subsequent punches. The store holds at most one record per
/// (employee, date) pair.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceDay, DayStatus};
/// use chrono::NaiveDate;
///
/// let day = AttendanceDay::new("emp_001", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// assert_eq!(day.status, DayStatus::Absent);
/// assert_eq!(day.total_work_minutes, 0);
/// assert!(day.work_sessions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDay {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The calendar date of the record (UTC day of the first punch).
    pub date: NaiveDate,
    /// Work intervals in chronological order.
    #[serde(default)]
    pub work_sessions: SessionLog,
    /// Break intervals in chronological order.
    #[serde(default)]
    pub break_sessions: SessionLog,
    /// Accumulated whole minutes of closed work sessions.
    #[serde(default)]
    pub total_work_minutes: i64,
    /// Accumulated whole minutes of closed break sessions.
    #[serde(default)]
    pub total_break_minutes: i64,
    /// Presence status derived from work punch-ins.
    #[serde(default)]
    pub status: DayStatus,
    /// Optimistic-concurrency token. `0` means the record has never been
    /// persisted; the store bumps it on every successful save.
    #[serde(default)]
    pub version: u64,
}

impl AttendanceDay {
    /// Creates a fresh, absent record with empty session logs.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            work_sessions: SessionLog::new(),
            break_sessions: SessionLog::new(),
            total_work_minutes: 0,
            total_break_minutes: 0,
            status: DayStatus::Absent,
            version: 0,
        }
    }

    /// Marks the day present. Idempotent; a day never reverts to absent.
    pub fn mark_present(&mut self) {
        self.status = DayStatus::Present;
    }
}
