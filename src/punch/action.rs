//! Punch action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// The four punch types an employee can submit.
///
/// The vocabulary is closed; anything else is rejected while parsing with
/// [`EngineError::InvalidAction`] rather than reaching the state machine.
///
/// # Example
///
/// ```
/// use attendance_engine::punch::PunchAction;
///
/// let action: PunchAction = "work_in".parse().unwrap();
/// assert_eq!(action, PunchAction::WorkIn);
/// assert!("teleport".parse::<PunchAction>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchAction {
    /// Start a work session.
    #[serde(alias = "workPunchIn")]
    WorkIn,
    /// End the open work session.
    #[serde(alias = "workPunchOut")]
    WorkOut,
    /// Start a break session.
    #[serde(alias = "breakPunchIn")]
    BreakIn,
    /// End the open break session.
    #[serde(alias = "breakPunchOut")]
    BreakOut,
}

impl fmt::Display for PunchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PunchAction::WorkIn => "work_in",
            PunchAction::WorkOut => "work_out",
            PunchAction::BreakIn => "break_in",
            PunchAction::BreakOut => "break_out",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PunchAction {
    type Err = EngineError;

    /// Parses an action name.
    ///
    /// Accepts the snake_case names and, for compatibility with punch
    /// clients written against the previous service, their camelCase
    /// spellings (`workPunchIn` and friends).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work_in" | "workPunchIn" => Ok(PunchAction::WorkIn),
            "work_out" | "workPunchOut" => Ok(PunchAction::WorkOut),
            "break_in" | "breakPunchIn" => Ok(PunchAction::BreakIn),
            "break_out" | "breakPunchOut" => Ok(PunchAction::BreakOut),
            _ => Err(EngineError::InvalidAction {
                action: s.to_string(),
            }),
        }
    }
}
