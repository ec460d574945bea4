//! Calendar-month arithmetic for reporting periods.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

/// Returns the inclusive `[first, last]` day pair of a calendar month.
///
/// Leap years come from the calendar itself, never from a lookup table.
///
/// # Example
///
/// ```
/// use attendance_engine::report::month_bounds;
/// use chrono::NaiveDate;
///
/// let (first, last) = month_bounds(2024, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(month_bounds(2024, 13).is_err());
/// ```
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(EngineError::InvalidPeriod { year, month })?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(EngineError::InvalidPeriod { year, month })?;
    Ok((first, last))
}

/// Returns every day of a calendar month in date order.
pub fn days_in_month(year: i32, month: u32) -> EngineResult<Vec<NaiveDate>> {
    let (first, last) = month_bounds(year, month)?;
    Ok(first.iter_days().take_while(|day| *day <= last).collect())
}
