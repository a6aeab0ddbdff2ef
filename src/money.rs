//! Fixed-precision monetary values.
//!
//! This module provides the [`Money`] type used for every amount the engine
//! stores or reports. Amounts are backed by [`rust_decimal::Decimal`] so
//! arithmetic never suffers binary floating-point drift, and rounding to the
//! stored 2-decimal precision happens exactly once, at presentation, never
//! mid-computation.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A monetary amount with fixed 2-decimal reporting precision.
///
/// `Money` is a thin newtype over [`Decimal`]. Intermediate results (for
/// example chained percentage math) keep full decimal precision; callers
/// round with [`Money::round_2`] only when an amount is stored on a payslip
/// or reported in a total.
///
/// Serialized as a decimal string, never a native float, so the rounding
/// invariants survive any wire boundary.
///
/// # Example
///
/// ```
/// use payroll_engine::money::Money;
///
/// let basic: Money = "5000.00".parse().unwrap();
/// let housing = basic.percent_of("20".parse().unwrap());
/// assert_eq!(housing.round_2(), Money::from_cents(100_000));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a money value from an integer number of minor units (cents).
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1342_00).to_string(), "1342.00");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Creates a money value from a raw decimal.
    pub fn from_decimal(value: Decimal) -> Self {
        Money(value)
    }

    /// Returns the underlying decimal value at full precision.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount rounded to 2 decimals as integer minor units, or
    /// `None` if the value does not fit in an `i64`.
    pub fn as_cents(&self) -> Option<i64> {
        (self.round_2().0 * Decimal::ONE_HUNDRED).to_i64()
    }

    /// Rounds half-up (midpoint away from zero) to 2 decimal places.
    ///
    /// This is the single presentation-time rounding step; nothing else in
    /// the engine rounds.
    pub fn round_2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Computes `self * percent / 100` without rounding.
    ///
    /// Chained percentage operations stay at full precision; the caller
    /// rounds once at the end with [`Money::round_2`].
    pub fn percent_of(&self, percent: Decimal) -> Self {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// Returns true if the amount is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Validates that the amount is not negative.
    ///
    /// Used where negativity is disallowed, such as component values and
    /// basic salary. Fails with [`EngineError::InvalidAmount`] naming the
    /// offending context.
    pub fn ensure_non_negative(self, context: &str) -> EngineResult<Self> {
        if self.is_negative() {
            Err(EngineError::InvalidAmount {
                message: format!("{} may not be negative, got {}", context, self),
            })
        } else {
            Ok(self)
        }
    }
}

impl FromStr for Money {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(Money)
            .map_err(|e| EngineError::InvalidAmount {
                message: format!("'{}' is not a valid decimal amount: {}", s, e),
            })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_2().0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_cents_is_two_decimal() {
        assert_eq!(Money::from_cents(123_45), money("123.45"));
        assert_eq!(Money::from_cents(0), Money::ZERO);
        assert_eq!(Money::from_cents(-50), money("-0.50"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Money::from_str("twelve").unwrap_err();
        match err {
            EngineError::InvalidAmount { message } => {
                assert!(message.contains("twelve"));
            }
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_percent_of_keeps_full_precision() {
        // 33.335% of 100.01 = 33.33833335; must not round mid-computation
        let base = money("100.01");
        let result = base.percent_of(dec("33.335"));
        assert_eq!(result.amount(), dec("33.33833335"));
        assert_eq!(result.round_2(), money("33.34"));
    }

    #[test]
    fn test_chained_percentages_round_once() {
        // 10% of 10% of 333.33 is 3.3333; rounding each step would give 3.33
        // via 33.33, and so would single rounding here, but at the half-cent
        // boundary the difference shows.
        let base = money("50.05");
        let chained = base.percent_of(dec("10")).percent_of(dec("10"));
        assert_eq!(chained.amount(), dec("0.5005"));
        assert_eq!(chained.round_2(), money("0.50"));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(money("2.005").round_2(), money("2.01"));
        assert_eq!(money("2.004").round_2(), money("2.00"));
        assert_eq!(money("-2.005").round_2(), money("-2.01"));
    }

    #[test]
    fn test_sum_of_rounded_items_matches_rounded_total() {
        let items = [money("100.10"), money("200.25"), money("0.65")];
        let total: Money = items.iter().copied().sum();
        assert_eq!(total, money("301.00"));
        let rounded_sum: Money = items.iter().map(|m| m.round_2()).sum();
        assert_eq!(rounded_sum, total.round_2());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(money("10.00") + money("2.50"), money("12.50"));
        assert_eq!(money("10.00") - money("12.50"), money("-2.50"));
        assert_eq!(-money("3.00"), money("-3.00"));

        let mut acc = Money::ZERO;
        acc += money("1.25");
        acc -= money("0.25");
        assert_eq!(acc, money("1.00"));
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(money("0").ensure_non_negative("value").is_ok());
        assert!(money("10.50").ensure_non_negative("value").is_ok());

        let err = money("-0.01").ensure_non_negative("basic salary").unwrap_err();
        match err {
            EngineError::InvalidAmount { message } => {
                assert!(message.contains("basic salary"));
            }
            other => panic!("Expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_as_cents() {
        assert_eq!(money("1342.00").as_cents(), Some(134_200));
        assert_eq!(money("0.005").as_cents(), Some(1));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&money("1500.50")).unwrap();
        assert_eq!(json, "\"1500.50\"");

        let back: Money = serde_json::from_str("\"1500.50\"").unwrap();
        assert_eq!(back, money("1500.50"));
    }

    #[test]
    fn test_display_is_two_decimal() {
        assert_eq!(money("5").to_string(), "5.00");
        assert_eq!(money("5.005").to_string(), "5.01");
    }
}
