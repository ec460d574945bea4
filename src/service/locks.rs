//! Per-record lock registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes punch processing per (employee, date).
///
/// Each key gets its own async mutex, created on demand, so punches for
/// different employees or days never contend. The registry itself is only
/// locked for the map lookup, never across the guarded critical section.
#[derive(Debug, Default)]
pub struct DayLocks {
    entries: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
}

impl DayLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one (employee, date) pair, waiting behind any
    /// holder of the same pair.
    pub async fn acquire(&self, employee_id: &str, date: NaiveDate) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self.entries.lock().await;
            entries
                .entry((employee_id.to_string(), date))
                .or_default()
                .clone()
        };
        entry.lock_owned().await
    }

    /// Drops registry entries that nobody currently holds or waits on.
    pub async fn compact(&self) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Returns the number of registered keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_same_key_blocks_until_released() {
        let locks = DayLocks::new();
        let guard = locks.acquire("emp_001", make_date("2024-03-05")).await;

        let blocked = timeout(
            Duration::from_millis(50),
            locks.acquire("emp_001", make_date("2024-03-05")),
        )
        .await;
        assert!(blocked.is_err());

        drop(guard);
        let acquired = timeout(
            Duration::from_millis(50),
            locks.acquire("emp_001", make_date("2024-03-05")),
        )
        .await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_contend() {
        let locks = DayLocks::new();
        let _held = locks.acquire("emp_001", make_date("2024-03-05")).await;

        // Different employee, and different date for the same employee
        let other_employee = timeout(
            Duration::from_millis(50),
            locks.acquire("emp_002", make_date("2024-03-05")),
        )
        .await;
        assert!(other_employee.is_ok());

        let other_date = timeout(
            Duration::from_millis(50),
            locks.acquire("emp_001", make_date("2024-03-06")),
        )
        .await;
        assert!(other_date.is_ok());
    }

    #[tokio::test]
    async fn test_compact_drops_idle_entries_and_keeps_held_ones() {
        let locks = DayLocks::new();
        let held = locks.acquire("emp_001", make_date("2024-03-05")).await;
        drop(locks.acquire("emp_002", make_date("2024-03-05")).await);
        assert_eq!(locks.len().await, 2);

        locks.compact().await;
        assert_eq!(locks.len().await, 1);

        drop(held);
        locks.compact().await;
        assert_eq!(locks.len().await, 0);
    }
}
