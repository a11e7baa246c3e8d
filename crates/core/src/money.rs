use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::from(cents) / Decimal::from(100))
    }

    pub fn to_cents(self) -> i64 {
        (self.0 * Decimal::from(100)).to_i64().unwrap()
    }

    /// Rounds to two decimal places; bank exports occasionally carry more.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_round_trip() {
        assert_eq!(Money::from_cents(123456).to_cents(), 123456);
        assert_eq!(Money::from_cents(-2500).to_cents(), -2500);
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("1.015").unwrap());
        assert_eq!(m.to_cents(), 102);
    }

    #[test]
    fn zero_is_zero() {
        assert!(Money::zero().is_zero());
        assert!(!Money::from_cents(1).is_zero());
    }

    #[test]
    fn addition() {
        let sum = Money::from_cents(150) + Money::from_cents(-50);
        assert_eq!(sum.to_cents(), 100);
    }

    #[test]
    fn display_formats_dollars() {
        assert_eq!(Money::from_cents(123456).to_string(), "$1234.56");
    }
}
