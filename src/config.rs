//! Engine policy configuration.
//!
//! This module provides the [`EnginePolicy`] type, the small set of
//! runtime knobs the engine reads: which directory roles appear on
//! rosters, and how long a store call may take. Policies load from a
//! YAML file but every field has a default, so embedders can also start
//! from [`EnginePolicy::default`].

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Role;

/// Runtime policy for the attendance engine.
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::EnginePolicy;
///
/// let policy = EnginePolicy::load("./config/attendance.yaml").unwrap();
/// println!("store timeout: {}ms", policy.store_timeout_ms);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginePolicy {
    /// Roles included in attendance rosters and the monthly matrix.
    pub roster_roles: Vec<Role>,
    /// Upper bound for a single record store call, in milliseconds.
    pub store_timeout_ms: u64,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            roster_roles: vec![Role::Employee, Role::Supervisor],
            store_timeout_ms: 5_000,
        }
    }
}

impl EnginePolicy {
    /// Loads the policy from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns the parsed policy on success, or an error if:
    /// - The file is missing ([`EngineError::ConfigNotFound`])
    /// - The file contains invalid YAML ([`EngineError::ConfigParseError`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the store call deadline as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
