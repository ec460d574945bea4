//! Roster model: the engine's read-only view of the employee directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directory role of an employee.
///
/// Roles are assigned by the identity provider; the engine only reads them
/// for report scoping and roster filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full visibility over every employee's records.
    Admin,
    /// Appears on attendance rosters alongside employees.
    Supervisor,
    /// Regular roster member.
    Employee,
    /// External account; never part of attendance rosters.
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
            Role::Client => "client",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses a role name case-insensitively. The error carries the
    /// unrecognized input for the caller's diagnostics.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            "client" => Ok(Role::Client),
            _ => Err(s.to_string()),
        }
    }
}

/// One entry of the employee directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Stable identifier of the employee.
    pub employee_id: String,
    /// Display name of the employee.
    pub name: String,
    /// Directory role of the employee.
    pub role: Role,
}

impl RosterEntry {
    /// Creates a roster entry.
    pub fn new(employee_id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            role,
        }
    }
}
