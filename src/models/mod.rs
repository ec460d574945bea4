//! Core data models for the Attendance Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance_day;
mod report;
mod roster;
mod session;

pub use attendance_day::{AttendanceDay, DayStatus};
pub use report::{DailySummary, EmployeeMonthlyStatus, TodayStatus};
pub use roster::{Role, RosterEntry};
pub use session::{CloseError, Session, SessionLog};
