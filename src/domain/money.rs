use crate::error::CheckoutError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Number of decimal places in the currency's minor unit.
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// A non-negative currency amount.
///
/// This is a wrapper around `rust_decimal::Decimal` so that prices, taxes and
/// totals can never go negative and are always rounded the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(pub(crate) Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CheckoutError::ValidationError(format!(
                "Amount must not be negative: {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to the minor unit, half-up.
    ///
    /// Amounts are never negative, so "midpoint away from zero" is the same as
    /// rounding half-up.
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl TryFrom<Decimal> for Money {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Scaling by a non-negative rate (e.g. a tax rate).
impl Mul<Decimal> for Money {
    type Output = Self;
    fn mul(self, rate: Decimal) -> Self::Output {
        Self(self.0 * rate.max(Decimal::ZERO))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.round_to_cents().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_validation() {
        assert!(Money::new(dec!(0)).is_ok());
        assert!(Money::new(dec!(9.99)).is_ok());
        assert!(matches!(
            Money::new(dec!(-0.01)),
            Err(CheckoutError::ValidationError(_))
        ));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money(dec!(2.999)).round_to_cents(), Money(dec!(3.00)));
        assert_eq!(Money(dec!(5.249)).round_to_cents(), Money(dec!(5.25)));
        assert_eq!(Money(dec!(0.125)).round_to_cents(), Money(dec!(0.13)));
        assert_eq!(Money(dec!(0.124)).round_to_cents(), Money(dec!(0.12)));
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money(dec!(2.5)).to_string(), "$2.50");
        assert_eq!(Money(dec!(0)).to_string(), "$0.00");
        assert_eq!(Money(dec!(109.99)).to_string(), "$109.99");
    }

    #[test]
    fn test_sum_preserves_zero_items() {
        let total: Money = [Money(dec!(49.99)), Money::ZERO, Money(dec!(2.5))]
            .into_iter()
            .sum();
        assert_eq!(total, Money(dec!(52.49)));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Money>("\"-1.00\"").is_err());
        let money: Money = serde_json::from_str("\"29.99\"").unwrap();
        assert_eq!(money.value(), dec!(29.99));
    }
}
