//! Type-safe unit price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] to avoid floating point drift in memory,
//! but are written as plain JSON numbers so persisted carts stay readable by
//! earlier app versions (`"price": 19.99`). Only amounts that a JSON number
//! carries exactly are accepted, so a saved cart always reads back unchanged.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input could not be parsed as a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is too large or too precise to be stored exactly.
    #[error("price {0} cannot be stored exactly")]
    OutOfRange(Decimal),
}

/// Digits an `f64` always carries through a decimal round trip.
const MAX_SIGNIFICANT_DIGITS: u32 = 15;

/// Exclusive upper bound on a price, in whole currency units.
const MAX_WHOLE_UNITS: i64 = 1_000_000_000_000;

/// A non-negative unit price in the store's currency.
///
/// ## Examples
///
/// ```
/// use go_marketplace_core::Price;
/// use rust_decimal::Decimal;
///
/// let price: Price = "19.99".parse().unwrap();
/// assert_eq!(price.amount(), Decimal::new(1999, 2));
/// assert_eq!(price.display(), "$19.99");
///
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price, rejecting negative amounts and amounts that would
    /// not survive being saved as a JSON number.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero and
    /// [`PriceError::OutOfRange`] if it has more than 15 significant digits,
    /// is a trillion or more, or otherwise reads back from JSON as a
    /// different number.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let amount = non_negative(amount)?;
        if amount >= Decimal::from(MAX_WHOLE_UNITS)
            || significant_digits(amount) > MAX_SIGNIFICANT_DIGITS
            || !survives_json(amount)
        {
            return Err(PriceError::OutOfRange(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero and
    /// [`PriceError::OutOfRange`] if it is too large to store.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
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
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything read from a JSON number already round-trips, including
        // float noise such as 0.30000000000000004 written by older clients.
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        non_negative(amount)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Reject amounts below zero and fold `-0` into `0`.
fn non_negative(amount: Decimal) -> Result<Decimal, PriceError> {
    if amount.is_zero() {
        return Ok(amount.abs());
    }
    if amount.is_sign_negative() {
        return Err(PriceError::Negative(amount));
    }
    Ok(amount)
}

/// Write `amount` the way a saved cart does and check it reads back equal.
fn survives_json(amount: Decimal) -> bool {
    serde_json::to_value(Price(amount))
        .and_then(rust_decimal::serde::float::deserialize)
        .is_ok_and(|back: Decimal| back == amount)
}

fn significant_digits(amount: Decimal) -> u32 {
    amount
        .normalize()
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |digits| digits + 1)
}
