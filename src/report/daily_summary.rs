//! Daily summary shaping and duration display formatting.

use crate::models::{AttendanceDay, DailySummary};

/// Formats accumulated minutes as `"H hrs M mins"`.
///
/// Plain integer division and remainder; the accumulators already carry
/// whole minutes, so no rounding happens here.
///
/// # Example
///
/// ```
/// use attendance_engine::report::format_minutes;
///
/// assert_eq!(format_minutes(125), "2 hrs 5 mins");
/// assert_eq!(format_minutes(0), "0 hrs 0 mins");
/// ```
pub fn format_minutes(total_minutes: i64) -> String {
    format!("{} hrs {} mins", total_minutes / 60, total_minutes % 60)
}

/// Shapes one attendance record into its daily summary row.
///
/// The punch-in/punch-out columns show the latest work session: an open
/// session has a punch-in and no punch-out yet, a day without work
/// sessions has neither.
pub fn summarize_day(day: &AttendanceDay) -> DailySummary {
    let latest = day.work_sessions.last();
    DailySummary {
        employee_id: day.employee_id.clone(),
        date: day.date,
        punch_in: latest.map(|session| session.punch_in()),
        punch_out: latest.and_then(|session| session.punch_out()),
        total_work_display: format_minutes(day.total_work_minutes),
        total_break_display: format_minutes(day.total_break_minutes),
        status: day.status,
    }
}
