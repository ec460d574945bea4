//! Monthly status matrix construction.
//!
//! The matrix is the authority for "absence by omission": every roster
//! employee gets a status for every day of the month, and only days with an
//! attendance record deviate from `Absent`.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::EngineResult;
use crate::models::{AttendanceDay, DayStatus, EmployeeMonthlyStatus, RosterEntry};
use crate::report::month_range::{days_in_month, month_bounds};

/// Builds the per-employee per-day status matrix for one calendar month.
///
/// Every employee in `employees` appears in the result, in input order,
/// with one entry per day of the month initialized to [`DayStatus::Absent`].
/// Each record whose date falls inside the month overwrites that day with
/// the record's status. Records for employees not on the roster, or dated
/// outside the month, are ignored.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceDay, DayStatus, Role, RosterEntry};
/// use attendance_engine::report::build_monthly_matrix;
/// use chrono::NaiveDate;
///
/// let employees = vec![RosterEntry::new("emp_001", "Asha Patel", Role::Employee)];
/// let mut day = AttendanceDay::new("emp_001", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// day.mark_present();
///
/// let matrix = build_monthly_matrix(&employees, &[day], 2024, 3).unwrap();
/// assert_eq!(matrix[0].days.len(), 31);
/// assert_eq!(
///     matrix[0].days[&NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()],
///     DayStatus::Present
/// );
/// ```
pub fn build_monthly_matrix(
    employees: &[RosterEntry],
    records: &[AttendanceDay],
    year: i32,
    month: u32,
) -> EngineResult<Vec<EmployeeMonthlyStatus>> {
    let (first, last) = month_bounds(year, month)?;
    let days = days_in_month(year, month)?;

    let blank: BTreeMap<_, _> = days.iter().map(|day| (*day, DayStatus::Absent)).collect();
    let mut rows: Vec<EmployeeMonthlyStatus> = employees
        .iter()
        .map(|employee| EmployeeMonthlyStatus {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            days: blank.clone(),
        })
        .collect();

    let index: HashMap<&str, usize> = employees
        .iter()
        .enumerate()
        .map(|(i, employee)| (employee.employee_id.as_str(), i))
        .collect();

    for record in records {
        if record.date < first || record.date > last {
            continue;
        }
        if let Some(&i) = index.get(record.employee_id.as_str()) {
            rows[i].days.insert(record.date, record.status);
        }
    }

    Ok(rows)
}
