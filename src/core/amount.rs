//! Quantities moved by transactions and held in the ledger
//!
//! Block and balance descriptions carry plain JSON numbers. Whole numbers are
//! kept as exact integers so arithmetic and serialization stay bit-exact;
//! anything with a fractional part is carried as a non-negative decimal.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Amount parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Amount must not be negative: {0}")]
    Negative(f64),
    #[error("Amount must be a finite number")]
    NotFinite,
    #[error("Amount out of range: {0} (must be below 2^64)")]
    OutOfRange(f64),
}

/// Exclusive upper bound on any amount, 2^64
const AMOUNT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// A non-negative quantity of coins
#[derive(Debug, Clone, Copy)]
pub enum Amount {
    /// Whole number of units
    Units(u64),
    /// Fractional quantity
    Decimal(f64),
}

impl Amount {
    pub const ZERO: Amount = Amount::Units(0);

    /// Build an amount from a float, rejecting negative and non-finite values
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if value < 0.0 {
            return Err(AmountError::Negative(value));
        }
        // integers this large arrive here already rounded
        if value >= AMOUNT_LIMIT {
            return Err(AmountError::OutOfRange(value));
        }
        Ok(Amount::Decimal(value))
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Amount::Units(units) => units as f64,
            Amount::Decimal(value) => value,
        }
    }

    /// Add two amounts, returning `None` on overflow
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        match (self, other) {
            (Amount::Units(a), Amount::Units(b)) => a.checked_add(b).map(Amount::Units),
            _ => {
                let sum = self.as_f64() + other.as_f64();
                (sum < AMOUNT_LIMIT).then_some(Amount::Decimal(sum))
            }
        }
    }

    /// Subtract `other`, returning `None` if the result would be negative
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        match (self, other) {
            (Amount::Units(a), Amount::Units(b)) => a.checked_sub(b).map(Amount::Units),
            _ => {
                let diff = self.as_f64() - other.as_f64();
                (diff >= 0.0).then_some(Amount::Decimal(diff))
            }
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Amount::Units(units)
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Amount::Units(a), Amount::Units(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Units(units) => write!(f, "{}", units),
            Amount::Decimal(value) => write!(f, "{:?}", value),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Units(units) => serializer.serialize_u64(*units),
            Amount::Decimal(value) => serializer.serialize_f64(*value),
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative number")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::Units(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        u64::try_from(value)
            .map(Amount::Units)
            .map_err(|_| E::custom(AmountError::Negative(value as f64)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Amount::from_f64(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
