//! Reporting logic for the Attendance Engine.
//!
//! This module contains the derived views over attendance records: calendar
//! month arithmetic, the monthly per-employee status matrix, and the daily
//! summary rows with their duration display format.

mod daily_summary;
mod month_range;
mod monthly_matrix;

pub use daily_summary::{format_minutes, summarize_day};
pub use month_range::{days_in_month, month_bounds};
pub use monthly_matrix::build_monthly_matrix;
