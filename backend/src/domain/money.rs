//! Non-negative currency amounts.
//!
//! Amounts are exact decimals so prices, discounts and delivery fees survive
//! the round trip through `NUMERIC(12, 2)` columns without binary rounding.
//! Values that column cannot hold exactly are rejected rather than rounded.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Decimal places a stored amount keeps.
pub const MAX_SCALE: i64 = 2;

/// Exclusive upper bound: ten integer digits.
const UPPER_BOUND: i64 = 10_000_000_000;

/// Validation errors for [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount was below zero.
    #[error("amount must not be negative: {value}")]
    Negative {
        /// Offending amount.
        value: String,
    },
    /// The amount has more than [`MAX_SCALE`] decimal places.
    #[error("amount must have at most 2 decimal places: {value}")]
    TooPrecise {
        /// Offending amount.
        value: String,
    },
    /// The amount has more than ten integer digits.
    #[error("amount must be below 10000000000: {value}")]
    TooLarge {
        /// Offending amount.
        value: String,
    },
    /// The text was not a decimal number.
    #[error("amount is not a decimal number: {value}")]
    Malformed {
        /// Offending input.
        value: String,
    },
}

/// A non-negative decimal amount.
///
/// # Examples
/// ```
/// use market_backend::domain::Money;
///
/// let price: Money = "5.00".parse().expect("valid amount");
/// assert_eq!(price, "5".parse::<Money>().expect("valid amount"));
/// assert!("-1".parse::<Money>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(BigDecimal);

impl Money {
    /// Validate a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] for amounts below zero,
    /// [`MoneyError::TooPrecise`] for sub-cent fractions and
    /// [`MoneyError::TooLarge`] beyond ten integer digits.
    pub fn new(value: BigDecimal) -> Result<Self, MoneyError> {
        if value < BigDecimal::from(0_i64) {
            return Err(MoneyError::Negative {
                value: value.to_string(),
            });
        }
        let (_, scale) = value.normalized().as_bigint_and_exponent();
        if scale > MAX_SCALE {
            return Err(MoneyError::TooPrecise {
                value: value.to_string(),
            });
        }
        if value >= BigDecimal::from(UPPER_BOUND) {
            return Err(MoneyError::TooLarge {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::from(0_i64))
    }

    /// Borrow the underlying decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Consume the amount, returning the decimal.
    #[must_use]
    pub fn into_decimal(self) -> BigDecimal {
        self.0
    }
}

impl TryFrom<BigDecimal> for Money {
    type Error = MoneyError;

    fn try_from(value: BigDecimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = BigDecimal::from_str(trimmed).map_err(|_| MoneyError::Malformed {
            value: trimmed.to_owned(),
        })?;
        Self::new(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = self
            .0
            .to_string()
            .parse::<f64>()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(number)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Integer(value) => Self::new(BigDecimal::from(value)),
            AmountRepr::Number(value) => value.to_string().parse(),
            AmountRepr::Text(value) => value.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
