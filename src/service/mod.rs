//! The attendance service: orchestration over the store and the punch
//! state machine.
//!
//! This layer owns what the state machine must not know about: loading and
//! lazily creating records, per-(employee, date) serialization, store call
//! deadlines, and the assembly of report inputs. It does not retry
//! anything; a lost optimistic write surfaces as
//! [`EngineError::ConcurrencyConflict`](crate::error::EngineError) for the
//! caller to retry once.

mod locks;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::config::EnginePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceDay, DailySummary, EmployeeMonthlyStatus, TodayStatus};
use crate::punch::{apply_punch, PunchAction, PunchOutcome};
use crate::report::{build_monthly_matrix, month_bounds, summarize_day};
use crate::store::{AttendanceStore, StoreResult};

use locks::DayLocks;

/// The result of a processed punch.
#[derive(Debug, Clone)]
pub struct PunchReceipt {
    /// What the punch did to the record.
    pub outcome: PunchOutcome,
    /// The record after processing: the stored copy when the punch
    /// mutated it, the unchanged copy for acknowledgment no-ops.
    pub record: AttendanceDay,
}

/// Orchestrates punches and reports over an [`AttendanceStore`].
pub struct AttendanceService<S> {
    store: Arc<S>,
    policy: EnginePolicy,
    locks: DayLocks,
}

impl<S: AttendanceStore> AttendanceService<S> {
    /// Creates a service over the given store and policy.
    pub fn new(store: Arc<S>, policy: EnginePolicy) -> Self {
        Self {
            store,
            policy,
            locks: DayLocks::new(),
        }
    }

    /// Returns the policy the service runs with.
    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Processes one punch.
    ///
    /// The attendance date is the UTC calendar date of `now`. The record is
    /// loaded (or lazily created), run through the state machine, and
    /// persisted only when the punch mutated it; acknowledgment no-ops
    /// leave the store untouched. Processing is serialized per
    /// (employee, date), so two punches for the same record never
    /// interleave inside this process.
    pub async fn punch(
        &self,
        employee_id: &str,
        action: PunchAction,
        now: DateTime<Utc>,
    ) -> EngineResult<PunchReceipt> {
        let date = now.date_naive();
        let guard = self.locks.acquire(employee_id, date).await;
        let result = self.punch_locked(employee_id, date, action, now).await;
        drop(guard);
        self.locks.compact().await;
        result
    }

    async fn punch_locked(
        &self,
        employee_id: &str,
        date: NaiveDate,
        action: PunchAction,
        now: DateTime<Utc>,
    ) -> EngineResult<PunchReceipt> {
        let mut day = self
            .with_deadline(self.store.find_day(employee_id, date))
            .await?
            .unwrap_or_else(|| AttendanceDay::new(employee_id, date));

        let outcome = apply_punch(&mut day, action, now)?;
        let record = if outcome.is_noop() {
            day
        } else {
            self.with_deadline(self.store.save_day(&day)).await?
        };

        debug!(
            employee_id,
            date = %date,
            action = %action,
            outcome = ?outcome,
            version = record.version,
            "punch processed"
        );
        Ok(PunchReceipt { outcome, record })
    }

    /// Builds the monthly status matrix for the policy's roster roles,
    /// optionally narrowed to one employee.
    pub async fn monthly_matrix(
        &self,
        year: i32,
        month: u32,
        employee_filter: Option<&str>,
    ) -> EngineResult<Vec<EmployeeMonthlyStatus>> {
        let (first, last) = month_bounds(year, month)?;

        let mut employees = self
            .with_deadline(self.store.list_employees(Some(&self.policy.roster_roles)))
            .await?;
        if let Some(id) = employee_filter {
            employees.retain(|entry| entry.employee_id == id);
        }

        let records = self
            .with_deadline(self.store.find_range(first, last, employee_filter))
            .await?;

        build_monthly_matrix(&employees, &records, year, month)
    }

    /// Returns daily summary rows for every record, optionally narrowed to
    /// one employee, sorted by (employee, date) for stable output.
    pub async fn daily_summaries(
        &self,
        employee_filter: Option<&str>,
    ) -> EngineResult<Vec<DailySummary>> {
        let mut records = self
            .with_deadline(self.store.find_all(employee_filter))
            .await?;
        records.sort_by(|a, b| {
            a.employee_id
                .cmp(&b.employee_id)
                .then_with(|| a.date.cmp(&b.date))
        });
        Ok(records.iter().map(summarize_day).collect())
    }

    /// Returns one employee's raw records, optionally narrowed to a
    /// calendar month, sorted by date ascending.
    pub async fn employee_days(
        &self,
        employee_id: &str,
        period: Option<(i32, u32)>,
    ) -> EngineResult<Vec<AttendanceDay>> {
        let mut records = match period {
            Some((year, month)) => {
                let (first, last) = month_bounds(year, month)?;
                self.with_deadline(self.store.find_range(first, last, Some(employee_id)))
                    .await?
            }
            None => {
                self.with_deadline(self.store.find_all(Some(employee_id)))
                    .await?
            }
        };
        records.sort_by_key(|day| day.date);
        Ok(records)
    }

    /// Returns the status line of every record dated `today`, joined with
    /// names from the full directory, sorted by employee id.
    ///
    /// Records whose employee no longer appears in the directory are
    /// skipped; the directory is the authority for who can be on the view.
    pub async fn today_roster(&self, today: NaiveDate) -> EngineResult<Vec<TodayStatus>> {
        let employees = self.with_deadline(self.store.list_employees(None)).await?;
        let names: HashMap<&str, &str> = employees
            .iter()
            .map(|entry| (entry.employee_id.as_str(), entry.name.as_str()))
            .collect();

        let mut records = self
            .with_deadline(self.store.find_range(today, today, None))
            .await?;
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));

        Ok(records
            .iter()
            .filter_map(|record| {
                names.get(record.employee_id.as_str()).map(|name| TodayStatus {
                    employee_id: record.employee_id.clone(),
                    name: (*name).to_string(),
                    date: record.date,
                    status: record.status,
                })
            })
            .collect())
    }

    /// Runs one store call under the policy deadline.
    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = StoreResult<T>>,
    ) -> EngineResult<T> {
        match tokio::time::timeout(self.policy.store_timeout(), call).await {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::StoreUnavailable {
                message: format!("store call exceeded {}ms", self.policy.store_timeout_ms),
            }),
        }
    }
}
