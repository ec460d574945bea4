//! In-memory store backend.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::models::{AttendanceDay, Role, RosterEntry};
use crate::store::{AttendanceStore, StoreError, StoreResult};

/// An in-memory [`AttendanceStore`] backed by `tokio::sync::RwLock`.
///
/// Attendance records are keyed by (employee, date); the roster is a flat
/// list. Version check-and-bump happens under the write lock, so saves are
/// atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    days: RwLock<HashMap<(String, NaiveDate), AttendanceDay>>,
    roster: RwLock<Vec<RosterEntry>>,
}

impl MemoryStore {
    /// Creates an empty store with an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with the given roster.
    pub fn with_roster(roster: Vec<RosterEntry>) -> Self {
        Self {
            days: RwLock::new(HashMap::new()),
            roster: RwLock::new(roster),
        }
    }

    /// Appends one entry to the roster.
    pub async fn add_employee(&self, entry: RosterEntry) {
        self.roster.write().await.push(entry);
    }
}

impl AttendanceStore for MemoryStore {
    async fn find_day(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceDay>> {
        let days = self.days.read().await;
        Ok(days.get(&(employee_id.to_string(), date)).cloned())
    }

    async fn save_day(&self, day: &AttendanceDay) -> StoreResult<AttendanceDay> {
        let mut days = self.days.write().await;
        let key = (day.employee_id.clone(), day.date);
        let current = days.get(&key).map(|stored| stored.version).unwrap_or(0);
        if current != day.version {
            return Err(StoreError::VersionConflict {
                employee_id: day.employee_id.clone(),
                date: day.date,
            });
        }
        let mut stored = day.clone();
        stored.version = current + 1;
        days.insert(key, stored.clone());
        Ok(stored)
    }

    async fn find_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<&str>,
    ) -> StoreResult<Vec<AttendanceDay>> {
        let days = self.days.read().await;
        Ok(days
            .values()
            .filter(|day| day.date >= start && day.date <= end)
            .filter(|day| employee_id.is_none_or(|id| day.employee_id == id))
            .cloned()
            .collect())
    }

    async fn find_all(&self, employee_id: Option<&str>) -> StoreResult<Vec<AttendanceDay>> {
        let days = self.days.read().await;
        Ok(days
            .values()
            .filter(|day| employee_id.is_none_or(|id| day.employee_id == id))
            .cloned()
            .collect())
    }

    async fn list_employees(&self, roles: Option<&[Role]>) -> StoreResult<Vec<RosterEntry>> {
        let roster = self.roster.read().await;
        Ok(roster
            .iter()
            .filter(|entry| roles.is_none_or(|roles| roles.contains(&entry.role)))
            .cloned()
            .collect())
    }
}
