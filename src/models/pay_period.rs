//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that defines the date range
//! a payslip or payroll run covers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents a pay period with its date range.
///
/// A pay period defines the time window a payslip calculation or payroll
/// run covers. Both bounds are inclusive.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
/// assert!(period.start_date <= period.end_date);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}
