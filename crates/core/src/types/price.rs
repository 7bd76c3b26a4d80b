//! Fixed-point price representation.
//!
//! Prices are stored as decimal strings with exactly two fractional digits
//! (`"10.50"`). Catalog documents written by older clients hold a JSON
//! number instead; those are converted from their shortest decimal text so
//! `19.99` reads back as `19.99` rather than `19.989999...`, and rounded
//! half away from zero when they carry more than two fractional digits.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a number: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More fractional digits than the currency's minor unit allows.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum allowed fractional digits.
        max: u32,
    },
}

/// A non-negative amount in rupees with paise precision.
///
/// ## Examples
///
/// ```
/// use smart_bazaar_core::Price;
///
/// let chai = Price::parse("10.5").unwrap();
/// assert_eq!(chai.to_string(), "10.50");
/// assert_eq!(chai.minor_units(), 1050);
/// assert_eq!(chai.display(), "₹10.50");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Number of fractional digits kept for every price.
    pub const SCALE: u32 = 2;

    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a price from user input such as `"19.99"` or `"20"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, not a decimal number,
    /// negative, or has more than two fractional digits.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(s).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::from_decimal(amount)
    }

    /// Build a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or has more than two
    /// significant fractional digits.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let mut amount = amount.normalize();
        if amount.scale() > Self::SCALE {
            return Err(PriceError::TooPrecise { max: Self::SCALE });
        }
        amount.rescale(Self::SCALE);
        // normalize() keeps the sign bit of -0
        amount.set_sign_positive(true);

        Ok(Self(amount))
    }

    /// Build a price from an amount in paise.
    #[must_use]
    pub fn from_minor_units(paise: u32) -> Self {
        Self(Decimal::new(i64::from(paise), Self::SCALE))
    }

    /// The amount in paise.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        // Scale is fixed at 2, so the mantissa is the paise count.
        i64::try_from(self.0.mantissa()).unwrap_or(i64::MAX)
    }

    /// The decimal amount in rupees.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with the rupee sign (e.g., "₹19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("₹{self}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal price as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Price::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Price::from_decimal(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Price::from_decimal(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom("price must be finite"));
        }
        // f64's Display is the shortest text that round-trips.
        let amount = Decimal::from_str(&v.to_string()).map_err(E::custom)?;
        // Older clients stored whatever parseFloat produced, e.g. 10.555.
        let amount =
            amount.round_dp_with_strategy(Price::SCALE, RoundingStrategy::MidpointAwayFromZero);
        Price::from_decimal(amount).map_err(E::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_to_two_places() {
        assert_eq!(Price::parse("10.5").unwrap().to_string(), "10.50");
        assert_eq!(Price::parse("20").unwrap().to_string(), "20.00");
        assert_eq!(Price::parse(" 19.99 ").unwrap().to_string(), "19.99");
    }

    #[test]
    fn test_parse_trailing_zeros_are_not_precision() {
        assert_eq!(Price::parse("4.500").unwrap().to_string(), "4.50");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert!(matches!(Price::parse("ten"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert_eq!(
            Price::parse("0.001"),
            Err(PriceError::TooPrecise { max: 2 })
        );
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let price = Price::parse("-0").unwrap();
        assert_eq!(price, Price::ZERO);
        assert_eq!(price.to_string(), "0.00");
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Price::from_minor_units(1999).to_string(), "19.99");
        assert_eq!(Price::parse("19.99").unwrap().minor_units(), 1999);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_value(Price::parse("10.5").unwrap()).unwrap();
        assert_eq!(json, serde_json::json!("10.50"));
    }

    #[test]
    fn test_deserializes_legacy_float_exactly() {
        let price: Price = serde_json::from_value(serde_json::json!(19.99)).unwrap();
        assert_eq!(price, Price::parse("19.99").unwrap());

        let whole: Price = serde_json::from_value(serde_json::json!(25)).unwrap();
        assert_eq!(whole.to_string(), "25.00");
    }

    #[test]
    fn test_deserializes_unrounded_legacy_float() {
        let price: Price = serde_json::from_value(serde_json::json!(10.555)).unwrap();
        assert_eq!(price.to_string(), "10.56");

        let price: Price = serde_json::from_value(serde_json::json!(4.004)).unwrap();
        assert_eq!(price.to_string(), "4.00");
    }

    #[test]
    fn test_string_prices_stay_strict() {
        let result: Result<Price, _> = serde_json::from_value(serde_json::json!("10.555"));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result: Result<Price, _> = serde_json::from_value(serde_json::json!(-3));
        assert!(result.is_err());
    }
}
