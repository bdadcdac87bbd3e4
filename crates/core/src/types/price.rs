//! Type-safe price representation using decimal arithmetic.
//!
//! The backend stores prices as floating-point dollars. On the client they are
//! held as [`Decimal`] so that cart and order totals add up exactly, and they
//! are written back to the wire as plain JSON numbers.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors from parsing a price entered by hand.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price: {0}")]
    Invalid(String),
    #[error("price cannot be negative: {0}")]
    Negative(String),
}

/// A menu or order price in the store's single currency (US dollars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// A zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The decimal amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Parses `12.5`, `12.50` or `$12.50`.
impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount =
            Decimal::from_str(digits).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(s.to_owned()));
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(1250).to_string(), "$12.50");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(price, Price::from_cents(999));
    }

    #[test]
    fn test_serialize_as_json_number() {
        let json = serde_json::to_string(&Price::from_cents(450)).unwrap();
        assert_eq!(json, "4.5");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(250).times(2), Price::from_cents(199)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(699));
    }

    #[test]
    fn test_parse_hand_entered() {
        assert_eq!("12.5".parse::<Price>().unwrap(), Price::from_cents(1250));
        assert_eq!(" $3.99 ".parse::<Price>().unwrap(), Price::from_cents(399));
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("-1".parse::<Price>(), Err(PriceError::Negative(_))));
    }
}
