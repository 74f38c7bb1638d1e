//! Type-safe price representation using decimal arithmetic.
//!
//! The store trades in a single currency, so a price is just a non-negative
//! decimal amount. Arithmetic stays in `Decimal` to keep totals exact.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store currency.
///
/// Deserializes from either a JSON number (`109.95`, as the catalog sends it)
/// or a string (`"109.95"`, as it is written back to the cart blob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Returns `true` for a zero amount.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at `Decimal::MAX`; catalog prices are external input.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::from_cents(2550).to_string(), "$25.50");
        assert_eq!(Price::new(Decimal::new(10, 0)).to_string(), "$10.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_times_and_sum_are_exact() {
        let a = Price::from_cents(1000).times(2);
        let b = Price::from_cents(550);
        let total: Price = [a, b].into_iter().sum();
        assert_eq!(total, Price::from_cents(2550));
    }

    #[test]
    fn test_arithmetic_saturates_on_absurd_prices() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.times(u32::MAX), huge);
        assert_eq!(huge + Price::from_cents(1), huge);

        let total: Price = [huge, huge, Price::from_cents(550)].into_iter().sum();
        assert_eq!(total, huge);
    }

    #[test]
    fn test_deserializes_from_json_number_and_string() {
        let from_number: Price = serde_json::from_str("109.95").unwrap();
        let from_string: Price = serde_json::from_str("\"109.95\"").unwrap();
        assert_eq!(from_number, Price::from_cents(10995));
        assert_eq!(from_number, from_string);
    }
}
