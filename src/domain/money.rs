//! Money type
//!
//! Domain primitive for prices and transaction amounts.
//! Values are validated at construction time, so a negative price or a
//! price with sub-cent precision cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum allowed value (fits NUMERIC(12,2))
const MAX_MONEY: &str = "9999999999.99";

/// Maximum decimal places (cents)
const MAX_SCALE: u32 = 2;

/// Money represents a validated, non-negative monetary value.
///
/// # Invariants
/// - Value is never negative
/// - At most 2 decimal places
/// - Maximum value is 9 999 999 999.99
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use coffee_shop::domain::Money;
///
/// let price: Money = "4.50".parse().unwrap();
/// assert_eq!(price.value(), Decimal::new(450, 2));
/// assert_eq!(price.to_string(), "4.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// Errors that can occur when creating Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Amount must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_MONEY})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Money {
    /// Zero money, "0.00"
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MAX_SCALE));

    /// Create new Money with validation.
    ///
    /// Trailing zeros beyond the cent position are accepted ("1.500").
    /// The stored value always has exactly two decimal places.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(value));
        }

        let mut value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(MoneyError::TooManyDecimals(value.scale()));
        }

        if value > max_money() {
            return Err(MoneyError::Overflow);
        }

        if value.is_zero() {
            value = Decimal::ZERO;
        }
        // Always carry cents, so "4.5" serializes as "4.50"
        value.rescale(MAX_SCALE);
        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, e.g. a line total.
    pub fn times(&self, quantity: i32) -> Result<Money, MoneyError> {
        let product = self
            .0
            .checked_mul(Decimal::from(quantity))
            .ok_or(MoneyError::Overflow)?;
        Money::new(product)
    }

    /// Add two amounts.
    pub fn try_add(&self, other: &Money) -> Result<Money, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::Overflow)?;
        Money::new(sum)
    }
}

fn max_money() -> Decimal {
    // MAX_MONEY is a literal that always parses
    Decimal::from_str(MAX_MONEY).unwrap_or(Decimal::MAX)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s.trim()).map_err(|e| MoneyError::ParseError(e.to_string()))?;
        Money::new(decimal)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_positive() {
        let money = Money::new(dec!(4.50)).unwrap();
        assert_eq!(money.value(), dec!(4.5));
    }

    #[test]
    fn test_money_zero_allowed() {
        assert_eq!(Money::new(Decimal::ZERO).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_money_negative_rejected() {
        let money = Money::new(dec!(-1.00));
        assert!(matches!(money, Err(MoneyError::Negative(_))));
    }

    #[test]
    fn test_money_too_many_decimals() {
        let money = Money::new(dec!(0.125));
        assert!(matches!(money, Err(MoneyError::TooManyDecimals(3))));
    }

    #[test]
    fn test_money_trailing_zeros_ok() {
        let money: Money = "1.500".parse().unwrap();
        assert_eq!(money.value(), dec!(1.5));
    }

    #[test]
    fn test_money_overflow() {
        let money = Money::new(dec!(10000000000));
        assert!(matches!(money, Err(MoneyError::Overflow)));
    }

    #[test]
    fn test_money_parse_error() {
        let money: Result<Money, _> = "abc".parse();
        assert!(matches!(money, Err(MoneyError::ParseError(_))));
    }

    #[test]
    fn test_money_display_two_digits() {
        assert_eq!(Money::new(dec!(10)).unwrap().to_string(), "10.00");
        assert_eq!(Money::new(dec!(3.5)).unwrap().to_string(), "3.50");
    }

    #[test]
    fn test_money_times() {
        let price = Money::new(dec!(2.35)).unwrap();
        assert_eq!(price.times(3).unwrap().value(), dec!(7.05));
    }

    #[test]
    fn test_money_serializes_with_cents() {
        let json = serde_json::to_string(&Money::new(dec!(4.5)).unwrap()).unwrap();
        assert_eq!(json, "\"4.50\"");
    }

    #[test]
    fn test_money_add() {
        let values = [
            Money::new(dec!(1.10)).unwrap(),
            Money::new(dec!(2.20)).unwrap(),
        ];
        let total = values[0].try_add(&values[1]).unwrap();
        assert_eq!(total.value(), dec!(3.30));
    }

    #[test]
    fn test_money_add_past_maximum_fails() {
        let half = Money::new(dec!(6000000000.00)).unwrap();
        assert!(matches!(half.try_add(&half), Err(MoneyError::Overflow)));

        let max: Money = MAX_MONEY.parse().unwrap();
        assert_eq!(max.try_add(&Money::ZERO).unwrap(), max);
    }
}
