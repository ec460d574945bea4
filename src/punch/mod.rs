//! Punch handling for the Attendance Engine.
//!
//! This module contains the punch action vocabulary and the state machine
//! that applies a punch to an attendance record: session opening and
//! closing, minute accumulation, and presence status transitions.

mod action;
mod apply;

pub use action::PunchAction;
pub use apply::{apply_punch, PunchOutcome};
