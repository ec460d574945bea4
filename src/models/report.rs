//! Report row models.
//!
//! Already-shaped rows produced by the reporting operations. Exporting
//! these to files or spreadsheets is out of scope; downstream consumers
//! receive them as JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::attendance_day::DayStatus;

/// One employee-day row of the daily summary report.
///
/// `punch_in`/`punch_out` are taken from the latest work session of the
/// day; an open session has no punch-out yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The employee this row belongs to.
    pub employee_id: String,
    /// The calendar date of the row.
    pub date: NaiveDate,
    /// Start of the latest work session, if any session was recorded.
    pub punch_in: Option<DateTime<Utc>>,
    /// End of the latest work session, if it has closed.
    pub punch_out: Option<DateTime<Utc>>,
    /// Accumulated work time as `"H hrs M mins"`.
    pub total_work_display: String,
    /// Accumulated break time as `"H hrs M mins"`.
    pub total_break_display: String,
    /// Presence status of the day.
    pub status: DayStatus,
}

/// One employee's row of the monthly status matrix.
///
/// `days` holds an entry for every calendar day of the month, in date
/// order; days without an attendance record are `Absent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeMonthlyStatus {
    /// The employee this row belongs to.
    pub employee_id: String,
    /// Display name taken from the roster.
    pub name: String,
    /// Per-day status covering the whole month.
    pub days: BTreeMap<NaiveDate, DayStatus>,
}

/// One employee's status line on the live roster view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayStatus {
    /// The employee this line belongs to.
    pub employee_id: String,
    /// Display name taken from the roster.
    pub name: String,
    /// The calendar date the line refers to.
    pub date: NaiveDate,
    /// Presence status for that date.
    pub status: DayStatus,
}
