//! Monetary amounts with 2-decimal semantics.
//!
//! Amounts are stored as integer cents so that line totals and stock
//! valuations stay exact. Fractional input (user-entered prices) is rounded
//! to 2 decimal places once, at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Amount in integer cents.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Round a fractional amount (e.g. "12.345" entered as 12.345) to cents.
    ///
    /// Rounds half away from zero, matching how user-facing prices are
    /// normally rounded.
    pub fn from_f64_rounded(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("monetary amount must be finite"));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(DomainError::validation("monetary amount out of range"));
        }
        Ok(Self(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a quantity, e.g. for a consumed-part line total.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(quantity as i64))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rounds_fractional_input_to_two_decimals() {
        assert_eq!(Money::from_f64_rounded(12.345).unwrap().cents(), 1235);
        assert_eq!(Money::from_f64_rounded(20.0).unwrap().cents(), 2000);
        assert_eq!(Money::from_f64_rounded(0.005).unwrap().cents(), 1);
    }

    #[test]
    fn rejects_non_finite_input() {
        assert!(Money::from_f64_rounded(f64::NAN).is_err());
        assert!(Money::from_f64_rounded(f64::INFINITY).is_err());
    }

    #[test]
    fn line_total_is_unit_price_times_quantity() {
        let unit = Money::from_cents(2000);
        assert_eq!(unit.times(3), Money::from_cents(6000));
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_cents(6000).to_string(), "60.00");
        assert_eq!(Money::from_cents(105).to_string(), "1.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
    }

    proptest! {
        #[test]
        fn times_matches_integer_multiplication(cents in 0i64..1_000_000, qty in 0u32..10_000) {
            let total = Money::from_cents(cents).times(qty);
            prop_assert_eq!(total.cents(), cents * qty as i64);
        }

        #[test]
        fn display_parse_is_stable(cents in -1_000_000i64..1_000_000) {
            let rendered = Money::from_cents(cents).to_string();
            let reparsed: f64 = rendered.parse().unwrap();
            prop_assert_eq!(Money::from_f64_rounded(reparsed).unwrap().cents(), cents);
        }
    }
}
