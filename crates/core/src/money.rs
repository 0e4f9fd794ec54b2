//! Non-negative decimal amounts.
//!
//! Prices, quantities and sums are exact decimals so that
//! `line_sum == unit_price * quantity` holds without rounding drift.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

macro_rules! impl_non_negative_decimal {
    ($t:ident, $name:literal) => {
        impl $t {
            pub const ZERO: Self = Self(Decimal::ZERO);

            /// Rejects negative values.
            pub fn new(value: Decimal) -> DomainResult<Self> {
                if value.is_sign_negative() && !value.is_zero() {
                    return Err(DomainError::validation(format!(
                        "{} must not be negative (got {value})",
                        $name
                    )));
                }
                Ok(Self(value.normalize()))
            }

            pub fn from_integer(value: u32) -> Self {
                Self(Decimal::from(value))
            }

            pub fn value(&self) -> Decimal {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Parse operator input the way a numeric form field does: surrounding
            /// whitespace is ignored, `,` is accepted as the decimal separator, and
            /// anything unparsable or negative reads as zero.
            pub fn parse_lenient(text: &str) -> Self {
                let cleaned = text.trim().replace(',', ".");
                Decimal::from_str(&cleaned)
                    .ok()
                    .and_then(|d| Self::new(d).ok())
                    .unwrap_or(Self::ZERO)
            }
        }

        impl TryFrom<Decimal> for $t {
            type Error = DomainError;

            fn try_from(value: Decimal) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for Decimal {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Monetary amount in currency units (e.g. rubles), never negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// Ordered quantity, never negative. Fractional quantities (weight goods) are allowed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl_non_negative_decimal!(Money, "amount");
impl_non_negative_decimal!(Quantity, "quantity");

impl Money {
    /// `self * quantity`, exact.
    pub fn times(self, quantity: Quantity) -> DomainResult<Money> {
        self.0
            .checked_mul(quantity.0)
            .map(|v| Money(v.normalize()))
            .ok_or(DomainError::Overflow)
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(|v| Money(v.normalize()))
            .ok_or(DomainError::Overflow)
    }

    /// Render with two fractional digits, as shown on a receipt.
    pub fn to_receipt_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        // Saturates instead of panicking; a single line is already bounded by `times`.
        let total = iter.fold(Decimal::ZERO, |acc, m| acc.saturating_add(m.0));
        Money(total.normalize())
    }
}

impl<'a> core::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Money::new(Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("amount")));
        assert!(Quantity::new(Decimal::new(-25, 1)).is_err());
    }

    #[test]
    fn negative_zero_is_zero() {
        let q = Quantity::new(-Decimal::ZERO).unwrap();
        assert!(q.is_zero());
    }

    #[test]
    fn times_is_exact_for_decimal_inputs() {
        let price = Money::new(Decimal::new(1999, 2)).unwrap(); // 19.99
        let qty = Quantity::new(Decimal::new(3, 0)).unwrap();
        assert_eq!(price.times(qty).unwrap().value(), Decimal::new(5997, 2));
    }

    #[test]
    fn parse_lenient_reads_form_input() {
        assert_eq!(Money::parse_lenient(" 12,50 ").value(), Decimal::new(125, 1));
        assert_eq!(Money::parse_lenient("100").value(), Decimal::from(100));
        assert!(Money::parse_lenient("").is_zero());
        assert!(Money::parse_lenient("abc").is_zero());
        assert!(Money::parse_lenient("-5").is_zero());
    }

    #[test]
    fn serde_rejects_negative_and_writes_numbers() {
        assert!(serde_json::from_str::<Money>("-3").is_err());
        let m: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "10.5");
    }

    #[test]
    fn receipt_string_has_two_digits() {
        assert_eq!(Money::from_integer(30).to_receipt_string(), "30.00");
    }

    proptest! {
        #[test]
        fn sum_matches_decimal_sum(cents in prop::collection::vec(0u32..10_000_000u32, 0..20)) {
            let amounts: Vec<Money> = cents
                .iter()
                .map(|c| Money::new(Decimal::new(i64::from(*c), 2)).unwrap())
                .collect();
            let expected: Decimal = cents.iter().map(|c| Decimal::new(i64::from(*c), 2)).sum();
            prop_assert_eq!(amounts.iter().sum::<Money>().value(), expected.normalize());
        }
    }
}
