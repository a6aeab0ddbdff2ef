//! Payroll run models.
//!
//! This module contains the [`PayrollRun`] aggregate and its lifecycle
//! status. A run groups a roster of employees with a shared pay period and
//! payment date, and collects the payslip items and per-employee errors
//! produced when the run is processed.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Employee, PayPeriod, PayStructure, PayslipLineItem};
use crate::money::Money;

/// The lifecycle status of a payroll run.
///
/// Runs move `Draft -> Processing -> Completed`. A run may be cancelled
/// from `Draft` or `Processing`; `Completed` and `Cancelled` are terminal.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RunStatus;
///
/// assert_eq!(RunStatus::Processing.to_string(), "processing");
/// assert!(RunStatus::Completed.is_terminal());
/// assert!(!RunStatus::Draft.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run has been created but not yet processed.
    Draft,
    /// The run is being calculated.
    Processing,
    /// Every roster entry produced an item or a recorded error.
    Completed,
    /// The run was abandoned before completion.
    Cancelled,
}

impl RunStatus {
    /// Returns true if no further transitions are allowed from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Cancelled)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Draft => "draft",
            RunStatus::Processing => "processing",
            RunStatus::Completed => "completed",
            RunStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One employee on a payroll run roster, paired with the structure to
/// evaluate for them.
///
/// The structure is captured on the entry when the run is created, so an
/// assignment change made while a run is in flight does not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The employee to calculate.
    pub employee: Employee,
    /// The structure assigned to the employee at run creation.
    pub structure: PayStructure,
}

/// A calculation failure recorded against a single roster entry.
///
/// Item errors let a run complete even when some employees fail; the run
/// reports which entries failed and why instead of aborting outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// The employee whose calculation failed.
    pub employee_id: String,
    /// A stable code classifying the failure.
    pub code: String,
    /// A human-readable description of the failure.
    pub message: String,
}

/// A batched payroll calculation over a roster of employees.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, PayrollRun, RunStatus};
/// use chrono::NaiveDate;
///
/// let run = PayrollRun::new(
///     PayPeriod {
///         start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///         end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     },
///     NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
///     vec![],
/// );
/// assert_eq!(run.status, RunStatus::Draft);
/// assert!(run.items.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The pay period every payslip in the run covers.
    pub period: PayPeriod,
    /// The date payment is scheduled for.
    pub payment_date: NaiveDate,
    /// The lifecycle status of the run.
    pub status: RunStatus,
    /// The employees selected for the run with their structures.
    pub roster: Vec<RosterEntry>,
    /// Payslip items produced by processing, one per successful entry.
    pub items: Vec<PayslipLineItem>,
    /// Failures recorded against roster entries that did not produce items.
    pub item_errors: Vec<ItemError>,
    /// The sum of net pay across all items, rounded once at aggregation.
    pub total_amount: Money,
    /// The roster size at creation, recomputed from items at completion.
    pub employee_count: usize,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollRun {
    /// Creates a new run in [`RunStatus::Draft`] with an empty result set.
    pub fn new(period: PayPeriod, payment_date: NaiveDate, roster: Vec<RosterEntry>) -> Self {
        let employee_count = roster.len();
        Self {
            id: Uuid::new_v4(),
            period,
            payment_date,
            status: RunStatus::Draft,
            roster,
            items: Vec::new(),
            item_errors: Vec::new(),
            total_amount: Money::ZERO,
            employee_count,
            created_at: Utc::now(),
        }
    }

    /// Returns how many roster entries have neither an item nor an error.
    pub fn unaccounted(&self) -> usize {
        self.roster
            .len()
            .saturating_sub(self.items.len() + self.item_errors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemError, PayFrequency};
    use std::str::FromStr;

    fn sample_period() -> PayPeriod {
        PayPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        }
    }

    fn sample_entry(id: &str) -> RosterEntry {
        RosterEntry {
            employee: Employee::new(id, "Test Employee"),
            structure: PayStructure {
                id: "struct_001".to_string(),
                name: "Staff grade 3".to_string(),
                basic_salary: Money::from_str("5000").unwrap(),
                allowances: vec![],
                deductions: vec![],
                frequency: PayFrequency::Monthly,
            },
        }
    }

    fn sample_run() -> PayrollRun {
        PayrollRun::new(
            sample_period(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            vec![sample_entry("emp_001"), sample_entry("emp_002")],
        )
    }

    #[test]
    fn test_new_run_starts_in_draft() {
        let run = sample_run();
        assert_eq!(run.status, RunStatus::Draft);
        assert_eq!(run.employee_count, 2);
        assert!(run.items.is_empty());
        assert!(run.item_errors.is_empty());
        assert_eq!(run.total_amount, Money::ZERO);
    }

    #[test]
    fn test_status_display_is_lowercase() {
        assert_eq!(RunStatus::Draft.to_string(), "draft");
        assert_eq!(RunStatus::Processing.to_string(), "processing");
        assert_eq!(RunStatus::Completed.to_string(), "completed");
        assert_eq!(RunStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_status_serialization_matches_display() {
        for status in [
            RunStatus::Draft,
            RunStatus::Processing,
            RunStatus::Completed,
            RunStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
            let back: RunStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RunStatus::Draft.is_terminal());
        assert!(!RunStatus::Processing.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_unaccounted_counts_missing_entries() {
        let mut run = sample_run();
        assert_eq!(run.unaccounted(), 2);

        run.item_errors.push(ItemError {
            employee_id: "emp_001".to_string(),
            code: "invalid_structure".to_string(),
            message: "basic salary must be positive".to_string(),
        });
        assert_eq!(run.unaccounted(), 1);
    }

    #[test]
    fn test_run_round_trip() {
        let run = sample_run();
        let json = serde_json::to_string(&run).unwrap();
        let back: PayrollRun = serde_json::from_str(&json).unwrap();
        assert_eq!(run, back);
    }

    #[test]
    fn test_run_serialization_shape() {
        let run = sample_run();
        let json = serde_json::to_string(&run).unwrap();
        assert!(json.contains("\"status\":\"draft\""));
        assert!(json.contains("\"payment_date\":\"2026-04-01\""));
        assert!(json.contains("\"roster\":["));
        assert!(json.contains("\"employee_count\":2"));
    }
}
