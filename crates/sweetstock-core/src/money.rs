//! # Money Module
//!
//! Provides the `Money` type for costs, prices, revenue and profit.
//!
//! ## Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WIRE (JSON)          "12.50"  or  12.5                                 │
//! │       │                                                                 │
//! │       ▼  Decimal parse, banker's rounding to 2 places                  │
//! │  MEMORY               Money(1250)       integer paise                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite               INTEGER 1250      SUM() stays exact              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WIRE (JSON)          "12.50"           always a string                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No floating point ever touches an amount after parsing, so revenue and
//! COGS accumulated over thousands of sales do not drift.
//!
//! ## Usage
//! ```rust
//! use sweetstock_core::money::Money;
//!
//! let cost = Money::from_paise(900);                        // 9.00
//! let cogs = cost.checked_mul(3).unwrap();                  // 27.00
//! let revenue = Money::from_paise(1500).checked_mul(3).unwrap();
//! assert_eq!(revenue.checked_sub(cogs).unwrap().to_string(), "18.00");
//!
//! assert_eq!(Money::from_paise(i64::MAX).checked_add(Money::from_paise(1)), None);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Decimal places carried by every amount.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// Signed so that profit may go negative when goods sell below cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Converts an arbitrary decimal into Money.
    ///
    /// Extra fractional digits are rounded half-to-even, the same rule a
    /// `NUMERIC(10,2)` column applies. Returns `None` when the value does
    /// not fit in i64 paise.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        (rounded * Decimal::ONE_HUNDRED).trunc().to_i64().map(Money)
    }

    /// Returns the amount as a 2-place decimal.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Display / Parse
// =============================================================================

impl fmt::Display for Money {
    /// Plain decimal with two places ("12.50", "-3.05"). The currency code
    /// travels separately.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Error returned when an amount string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount: {0}")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ParseMoneyError(s.to_string()))?;
        Money::from_decimal(value).ok_or_else(|| ParseMoneyError(s.to_string()))
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    /// Accepts `"12.5"` as well as `12.5`; Decimal's own visitor handles both.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value).ok_or_else(|| serde::de::Error::custom("amount out of range"))
    }
}

// =============================================================================
// Arithmetic
// =============================================================================
//
// Every operation is checked. `None` means the result left i64 paise; callers
// turn that into `CoreError::Overflow` rather than panicking or wrapping.

impl Money {
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Unit amount × quantity.
    #[inline]
    pub const fn checked_mul(self, quantity: i64) -> Option<Money> {
        match self.0.checked_mul(quantity) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Sum of `amounts`, or `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_two_places() {
        assert_eq!(Money::from_paise(1250).to_string(), "12.50");
        assert_eq!(Money::from_paise(5).to_string(), "0.05");
        assert_eq!(Money::from_paise(-305).to_string(), "-3.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse_rounds_half_even() {
        assert_eq!("10".parse::<Money>().unwrap().paise(), 1000);
        assert_eq!("10.125".parse::<Money>().unwrap().paise(), 1012);
        assert_eq!("10.135".parse::<Money>().unwrap().paise(), 1014);
        assert!("ten".parse::<Money>().is_err());
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let from_str: Money = serde_json::from_str("\"15.00\"").unwrap();
        let from_num: Money = serde_json::from_str("15").unwrap();
        let from_float: Money = serde_json::from_str("9.5").unwrap();
        assert_eq!(from_str, Money::from_paise(1500));
        assert_eq!(from_num, Money::from_paise(1500));
        assert_eq!(from_float, Money::from_paise(950));
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Money::from_paise(4500)).unwrap();
        assert_eq!(json, "\"45.00\"");
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_paise(1500);
        let cost = Money::from_paise(900);
        let profit = price
            .checked_mul(3)
            .and_then(|r| r.checked_sub(cost.checked_mul(3)?));
        assert_eq!(profit, Some(Money::from_paise(1800)));

        assert_eq!(Money::checked_sum([price, cost]), Some(Money::from_paise(2400)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::ZERO));

        let loss = price.checked_sub(cost.checked_mul(2).unwrap()).unwrap();
        assert!(loss.is_negative());
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let huge = Money::from_paise(10_000_000_000_000_000);
        assert_eq!(huge.checked_mul(1000), None);
        assert_eq!(Money::checked_sum([huge; 1000]), None);
        assert_eq!(Money::from_paise(i64::MIN).checked_sub(Money::from_paise(1)), None);
    }

    #[test]
    fn test_out_of_range_decimal_is_rejected() {
        assert!("100000000000000000000".parse::<Money>().is_err());
        assert!(serde_json::from_str::<Money>("\"1e30\"").is_err());
    }
}
