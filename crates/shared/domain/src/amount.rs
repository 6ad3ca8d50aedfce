//! Exact decimal amount value object.
//!
//! Balances and lifetime earnings are stored as `NUMERIC(20,8)`. An `Amount`
//! is always held at scale 8 and never touches binary floating point.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_INTEGER_DIGITS, AMOUNT_PRECISION, AMOUNT_SCALE};
use crate::error::{DomainError, DomainResult};

/// Decimal amount with precision 20 and scale 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Validate a decimal and bring it to scale 8.
    ///
    /// Values whose fractional part needs more than 8 digits are rejected
    /// rather than rounded, as are values with more than 12 integer digits.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(DomainError::validation(format!(
                "Amount {} has more than {} fractional digits",
                value, AMOUNT_SCALE
            )));
        }

        if value.trunc().abs() >= integer_limit() {
            return Err(DomainError::validation(format!(
                "Amount {} exceeds {} total digits",
                value, AMOUNT_PRECISION
            )));
        }

        let mut scaled = value;
        scaled.rescale(AMOUNT_SCALE);
        Ok(Self(scaled))
    }

    /// Wrap a value read back from a `NUMERIC(20,8)` column.
    ///
    /// The column already enforces the bounds, so only the scale is fixed up.
    pub fn from_column(value: Decimal) -> Self {
        let mut scaled = value;
        scaled.rescale(AMOUNT_SCALE);
        Self(scaled)
    }

    /// The zero amount (`0.00000000`)
    pub fn zero() -> Self {
        Self(Decimal::new(0, AMOUNT_SCALE))
    }

    /// Add two amounts, returning `None` if the sum leaves the 20/8 range.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0
            .checked_add(other.0)
            .and_then(|sum| Amount::new(sum).ok())
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is below zero
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Borrow the underlying decimal
    pub fn as_decimal(&self) -> &Decimal {
        &self.0
    }

    /// Consume into the underlying decimal
    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

fn integer_limit() -> Decimal {
    Decimal::from(10u64.pow(AMOUNT_INTEGER_DIGITS))
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("Invalid amount '{}': {}", s, e)))?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_has_eight_fractional_digits() {
        assert_eq!(Amount::zero().to_string(), "0.00000000");
        assert_eq!(Amount::default(), Amount::zero());
    }

    #[test]
    fn test_amount_rescaled_without_drift() {
        let amount: Amount = "123.45".parse().unwrap();
        assert_eq!(amount.to_string(), "123.45000000");
        assert_eq!(amount.as_decimal().scale(), AMOUNT_SCALE);
    }

    #[test]
    fn test_trailing_zeros_beyond_scale_accepted() {
        let amount: Amount = "1.5000000000".parse().unwrap();
        assert_eq!(amount.to_string(), "1.50000000");
    }

    #[test]
    fn test_too_many_fractional_digits_rejected() {
        let result: DomainResult<Amount> = "0.000000001".parse();
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_too_many_total_digits_rejected() {
        let result: DomainResult<Amount> = "1000000000000".parse();
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result: DomainResult<Amount> = "-1000000000000".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_largest_amount_accepted() {
        let amount: Amount = "999999999999.99999999".parse().unwrap();
        assert_eq!(amount.to_string(), "999999999999.99999999");
    }

    #[test]
    fn test_negative_amount_allowed() {
        let amount: Amount = "-2.5".parse().unwrap();
        assert!(amount.is_negative());
        assert_eq!(amount.to_string(), "-2.50000000");
    }

    #[test]
    fn test_checked_add() {
        let a: Amount = "1.25".parse().unwrap();
        let b: Amount = "2.00000001".parse().unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "3.25000001");

        let max: Amount = "999999999999.99999999".parse().unwrap();
        let tiny: Amount = "0.00000001".parse().unwrap();
        assert!(max.checked_add(tiny).is_none());
    }

    #[test]
    fn test_invalid_string_rejected() {
        let result: DomainResult<Amount> = "twelve".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let amount: Amount = "123.45".parse().unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"123.45000000\"");

        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let result: Result<Amount, _> = serde_json::from_str("\"0.123456789\"");
        assert!(result.is_err());
    }
}
