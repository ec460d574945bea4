//! The punch state machine.
//!
//! This module applies a single punch to an attendance record: it validates
//! the punch against the record's current session state, mutates the
//! session logs, and keeps the minute accumulators and presence status
//! consistent. Persistence and locking live above this layer; the machine
//! itself is pure record surgery.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceDay, CloseError};
use crate::punch::action::PunchAction;

/// What a successfully handled punch did to the record.
///
/// The two acknowledgment variants report that the employee was already in
/// the requested state. They are successes, not errors: the caller gets the
/// unchanged record back and nothing needs to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchOutcome {
    /// The punch mutated the record; the caller must persist it.
    Recorded,
    /// A work session was already open; nothing changed.
    AlreadyPunchedIn,
    /// A break session was already open; nothing changed.
    AlreadyOnBreak,
}

impl PunchOutcome {
    /// Returns true for the acknowledgment variants that left the record
    /// untouched.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            PunchOutcome::AlreadyPunchedIn | PunchOutcome::AlreadyOnBreak
        )
    }
}

/// Applies one punch to an attendance record.
///
/// On `Ok(PunchOutcome::Recorded)` the record was mutated and must be
/// persisted by the caller. On an acknowledgment outcome or on any error
/// the record is exactly as it was.
///
/// # Behavior
///
/// - `WorkIn` opens a work session and marks the day present; if a work
///   session is already open it acknowledges with `AlreadyPunchedIn`.
/// - `WorkOut` closes the open work session and adds its whole-minute
///   duration (truncated) to `total_work_minutes`; with no open session it
///   fails with [`EngineError::InvalidTransition`].
/// - `BreakIn`/`BreakOut` mirror the work pair over `break_sessions` and
///   `total_break_minutes`.
/// - A close timestamp earlier than the open session's punch-in fails with
///   [`EngineError::InvalidTransition`]; accepting it would subtract from
///   the accumulators.
///
/// Callers must serialize invocations per (employee, date); the machine
/// assumes it is the only writer of `day` for the duration of the call.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceDay, DayStatus};
/// use attendance_engine::punch::{apply_punch, PunchAction, PunchOutcome};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// let mut day = AttendanceDay::new("emp_001", date);
///
/// let t_in = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
/// let t_out = Utc.with_ymd_and_hms(2024, 3, 5, 11, 5, 30).unwrap();
///
/// assert_eq!(apply_punch(&mut day, PunchAction::WorkIn, t_in).unwrap(), PunchOutcome::Recorded);
/// assert_eq!(day.status, DayStatus::Present);
/// assert_eq!(apply_punch(&mut day, PunchAction::WorkOut, t_out).unwrap(), PunchOutcome::Recorded);
/// assert_eq!(day.total_work_minutes, 125);
/// ```
pub fn apply_punch(
    day: &mut AttendanceDay,
    action: PunchAction,
    now: DateTime<Utc>,
) -> EngineResult<PunchOutcome> {
    match action {
        PunchAction::WorkIn => {
            if !day.work_sessions.start(now) {
                return Ok(PunchOutcome::AlreadyPunchedIn);
            }
            day.mark_present();
            Ok(PunchOutcome::Recorded)
        }
        PunchAction::WorkOut => match day.work_sessions.close(now) {
            Ok(minutes) => {
                day.total_work_minutes += minutes;
                Ok(PunchOutcome::Recorded)
            }
            Err(CloseError::NotOpen) => Err(invalid_transition(
                day,
                action,
                "Cannot punch out without punching in.",
            )),
            Err(CloseError::OutOfOrder) => Err(invalid_transition(
                day,
                action,
                "Punch-out timestamp precedes the open punch-in.",
            )),
        },
        PunchAction::BreakIn => {
            if !day.break_sessions.start(now) {
                return Ok(PunchOutcome::AlreadyOnBreak);
            }
            Ok(PunchOutcome::Recorded)
        }
        PunchAction::BreakOut => match day.break_sessions.close(now) {
            Ok(minutes) => {
                day.total_break_minutes += minutes;
                Ok(PunchOutcome::Recorded)
            }
            Err(CloseError::NotOpen) => Err(invalid_transition(
                day,
                action,
                "Cannot end break without starting it.",
            )),
            Err(CloseError::OutOfOrder) => Err(invalid_transition(
                day,
                action,
                "Break end timestamp precedes the open punch-in.",
            )),
        },
    }
}

fn invalid_transition(day: &AttendanceDay, action: PunchAction, message: &str) -> EngineError {
    EngineError::InvalidTransition {
        employee_id: day.employee_id.clone(),
        date: day.date,
        action,
        message: message.to_string(),
    }
}
