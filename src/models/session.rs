//! Session model and the per-day session log.
//!
//! This module defines the Session state and the SessionLog container that
//! together represent the timed work and break intervals of one attendance
//! day.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single work or break interval within an attendance day.
///
/// The session state is explicit in the type: a session is either still
/// open (punched in but not yet out) or closed with both timestamps. There
/// is no "open session with a missing punch-out field" representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    /// The employee punched in and has not punched out yet.
    Open {
        /// When the session started.
        punch_in: DateTime<Utc>,
    },
    /// A completed interval with both endpoints recorded.
    Closed {
        /// When the session started.
        punch_in: DateTime<Utc>,
        /// When the session ended.
        punch_out: DateTime<Utc>,
    },
}

impl Session {
    /// Returns the start timestamp of the session.
    pub fn punch_in(&self) -> DateTime<Utc> {
        match self {
            Session::Open { punch_in } | Session::Closed { punch_in, .. } => *punch_in,
        }
    }

    /// Returns the end timestamp, or `None` while the session is open.
    pub fn punch_out(&self) -> Option<DateTime<Utc>> {
        match self {
            Session::Open { .. } => None,
            Session::Closed { punch_out, .. } => Some(*punch_out),
        }
    }

    /// Returns true while the session has no punch-out.
    pub fn is_open(&self) -> bool {
        matches!(self, Session::Open { .. })
    }

    /// Returns the whole minutes between punch-in and punch-out, truncating
    /// any partial minute, or `None` while the session is open.
    pub fn duration_minutes(&self) -> Option<i64> {
        match self {
            Session::Open { .. } => None,
            Session::Closed {
                punch_in,
                punch_out,
            } => Some((*punch_out - *punch_in).num_minutes()),
        }
    }
}

/// Why [`SessionLog::close`] refused to close a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseError {
    /// There is no open session to close.
    NotOpen,
    /// The close timestamp is earlier than the open session's punch-in.
    OutOfOrder,
}

/// The ordered sessions of one attendance day, append-only.
///
/// Elements are in insertion order, which is chronological order. The only
/// mutating operations are [`start`](SessionLog::start) and
/// [`close`](SessionLog::close), so at most one session is ever open and an
/// open session is always the last element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog(Vec<Session>);

impl SessionLog {
    /// Creates an empty session log.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the open session, if one exists.
    ///
    /// Only the last element can be open, so this is a tail inspection.
    pub fn open_session(&self) -> Option<&Session> {
        self.0.last().filter(|s| s.is_open())
    }

    /// Returns true while a session is open.
    pub fn has_open(&self) -> bool {
        self.open_session().is_some()
    }

    /// Opens a new session at `punch_in`.
    ///
    /// Returns `false` without touching the log when a session is already
    /// open, so a repeated start is a harmless no-op for the caller to
    /// acknowledge.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::SessionLog;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let mut log = SessionLog::new();
    /// let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
    /// assert!(log.start(now));
    /// assert!(!log.start(now));
    /// assert_eq!(log.len(), 1);
    /// ```
    pub fn start(&mut self, punch_in: DateTime<Utc>) -> bool {
        if self.has_open() {
            return false;
        }
        self.0.push(Session::Open { punch_in });
        true
    }

    /// Closes the open session at `punch_out` and returns its whole-minute
    /// duration, truncating any partial minute.
    ///
    /// Fails with [`CloseError::NotOpen`] when nothing is open and with
    /// [`CloseError::OutOfOrder`] when `punch_out` is earlier than the open
    /// session's punch-in. The log is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::SessionLog;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let mut log = SessionLog::new();
    /// log.start(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap());
    /// let out = Utc.with_ymd_and_hms(2024, 3, 5, 11, 5, 30).unwrap();
    /// assert_eq!(log.close(out), Ok(125));
    /// ```
    pub fn close(&mut self, punch_out: DateTime<Utc>) -> Result<i64, CloseError> {
        let last = match self.0.last_mut() {
            Some(last) if last.is_open() => last,
            _ => return Err(CloseError::NotOpen),
        };
        let punch_in = last.punch_in();
        if punch_out < punch_in {
            return Err(CloseError::OutOfOrder);
        }
        *last = Session::Closed {
            punch_in,
            punch_out,
        };
        Ok((punch_out - punch_in).num_minutes())
    }

    /// Returns the sessions in chronological order.
    pub fn sessions(&self) -> &[Session] {
        &self.0
    }

    /// Returns the most recent session, open or closed.
    pub fn last(&self) -> Option<&Session> {
        self.0.last()
    }

    /// Returns the number of sessions recorded so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no session has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
