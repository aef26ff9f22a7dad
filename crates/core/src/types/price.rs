//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price with currency information.
///
/// The backend quotes bare amounts in the shop currency, so a `Price`
/// serializes as its amount alone; the currency code is a client-side
/// display concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupiah, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency from a whole-unit amount.
    #[must_use]
    pub fn from_major(amount: i64) -> Self {
        Self {
            amount: Decimal::from(amount),
            currency_code: CurrencyCode::default(),
        }
    }

    /// A zero price in the default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_major(0)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code,
        }
    }
}

impl Add for Price {
    type Output = Self;

    // Mixed-currency sums are not meaningful; the backend quotes a single currency.
    fn add(self, rhs: Self) -> Self {
        Self {
            amount: self.amount + rhs.amount,
            currency_code: self.currency_code,
        }
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.amount, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accepts both numbers and numeric strings
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Ok(Self {
            amount,
            currency_code: CurrencyCode::default(),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IDR,
    USD,
    SGD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::IDR => "Rp",
            Self::USD => "$",
            Self::SGD => "S$",
        }
    }

    /// ISO 4217 code string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::IDR => "IDR",
            Self::USD => "USD",
            Self::SGD => "SGD",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_and_sum() {
        let latte = Price::from_major(45_000);
        let total: Price = [latte.times(2), Price::from_major(30_000)]
            .into_iter()
            .sum();
        assert_eq!(total.amount, Decimal::from(120_000));
        assert_eq!(total.currency_code, CurrencyCode::IDR);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_major(45_000).to_string(), "Rp45000");
    }

    #[test]
    fn test_deserialize_from_bare_number() {
        let price: Price = serde_json::from_str("45000").unwrap();
        assert_eq!(price, Price::from_major(45_000));
        assert_eq!(price.currency_code, CurrencyCode::IDR);
    }

    #[test]
    fn test_round_trip() {
        let price = Price::from_major(45_000);
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
