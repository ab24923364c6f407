//! Monetary amount type backed by `rust_decimal`.
//!
//! Amounts keep the scale they were read with, so the text form used by the
//! leading-digit analysis matches the source data. Rounding is explicit and
//! only happens where a check compares aggregated values.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Neg, Sub};
use std::str::FromStr;

/// An exact decimal amount as found in a ledger or log extract.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ledger_audit::Amount;
///
/// let amount = Amount::from_str("-49.995").unwrap();
/// assert_eq!(amount.round2().to_string(), "-50.00");
/// assert_eq!(amount.leading_digit(), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places used when comparing aggregated amounts.
    pub const COMPARE_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a `Decimal` without changing its scale.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Adds two amounts, `None` if the result exceeds the decimal range.
    pub fn checked_add(&self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Rounds to two decimal places, half to even.
    pub fn round2(&self) -> Self {
        Amount(
            self.0
                .round_dp_with_strategy(Self::COMPARE_SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Returns `true` when the amount is an exact multiple of `divisor`.
    ///
    /// The sign of the amount does not matter: `-2000` is a multiple of `1000`.
    pub fn is_multiple_of(&self, divisor: Decimal) -> bool {
        if divisor.is_zero() {
            return false;
        }
        (self.0 % divisor).is_zero()
    }

    /// First significant digit of the absolute value's text form.
    ///
    /// Returns `None` when that character is `0`, i.e. for zero and for
    /// magnitudes below one such as `0.5`.
    pub fn leading_digit(&self) -> Option<u8> {
        let text = self.0.abs().to_string();
        let first = text.chars().next()?;
        match first.to_digit(10) {
            Some(d) if d > 0 => Some(d as u8),
            _ => None,
        }
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
        match Decimal::from_str(trimmed) {
            Ok(d) => Ok(Amount(d)),
            Err(e) => Decimal::from_scientific(trimmed)
                .map(Amount)
                .map_err(|_| e),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_from_str_preserves_scale() {
        assert_eq!(amt("1.50").to_string(), "1.50");
        assert_eq!(amt("  2.5  ").to_string(), "2.5");
        assert_eq!(amt("+7").to_string(), "7");
        assert_eq!(amt("1e3"), amt("1000"));
    }

    #[test]
    fn test_round2_is_half_even() {
        assert_eq!(amt("0.125").round2(), amt("0.12"));
        assert_eq!(amt("0.135").round2(), amt("0.14"));
        assert_eq!(amt("-0.005").round2(), Amount::ZERO);
    }

    #[test]
    fn test_multiple_of_thousand_ignores_sign() {
        let k = Decimal::from(1000);
        assert!(amt("3000").is_multiple_of(k));
        assert!(amt("-2000").is_multiple_of(k));
        assert!(amt("3000.00").is_multiple_of(k));
        assert!(!amt("3001").is_multiple_of(k));
        assert!(!amt("1000.5").is_multiple_of(k));
        assert!(!amt("5").is_multiple_of(Decimal::ZERO));
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(amt("123").leading_digit(), Some(1));
        assert_eq!(amt("-45").leading_digit(), Some(4));
        assert_eq!(amt("999").leading_digit(), Some(9));
        assert_eq!(amt("0.5").leading_digit(), None);
        assert_eq!(amt("0").leading_digit(), None);
    }

    #[test]
    fn test_sign_predicates() {
        assert!(amt("1").is_positive());
        assert!(amt("-1").is_negative());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
        assert_eq!(-amt("5"), amt("-5"));
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(amt("50").checked_add(amt("-49.99")), Some(amt("0.01")));
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.checked_add(amt("1")), None);
        assert_eq!(max.checked_add(amt("-1")), Some(Amount::new(Decimal::MAX - Decimal::ONE)));
    }
}
