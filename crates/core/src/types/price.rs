//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A price with currency information.
///
/// Amounts are kept in the currency's standard unit (dollars, not cents) and
/// are never negative.
///
/// ## Examples
///
/// ```
/// use coffeecraft_core::{CurrencyCode, Price};
/// use rust_decimal::Decimal;
///
/// let price = Price::try_new(Decimal::new(399, 2), CurrencyCode::USD).unwrap();
/// assert_eq!(price.display(), "$3.99");
/// assert_eq!(price.times(3).display(), "$11.97");
///
/// assert!(Price::try_new(Decimal::new(-1, 0), CurrencyCode::USD).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn try_new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Build a price from an amount in minor units (cents).
    ///
    /// Negative inputs are clamped to zero.
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(cents.max(0), 2),
            currency_code,
        }
    }

    /// The price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self
                .amount
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
            currency_code: self.currency_code,
        }
    }

    /// Sum of two prices, saturating at [`Decimal::MAX`].
    ///
    /// The result keeps `self`'s currency; callers only add prices that
    /// share one.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            amount: self
                .amount
                .checked_add(other.amount)
                .unwrap_or(Decimal::MAX),
            currency_code: self.currency_code,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        let price = Price::from_cents(549, CurrencyCode::USD);
        assert_eq!(price.display(), "$5.49");

        let whole = Price::try_new(Decimal::from(4), CurrencyCode::USD).unwrap();
        assert_eq!(whole.display(), "$4.00");

        let euros = Price::from_cents(1250, CurrencyCode::EUR);
        assert_eq!(euros.to_string(), "€12.50");
    }

    #[test]
    fn test_negative_rejected() {
        let err = Price::try_new(Decimal::new(-100, 2), CurrencyCode::USD).unwrap_err();
        assert_eq!(err, PriceError::Negative(Decimal::new(-100, 2)));
        assert!(Price::try_new(Decimal::ZERO, CurrencyCode::USD).is_ok());
    }

    #[test]
    fn test_from_cents_clamps_negative() {
        assert!(Price::from_cents(-5, CurrencyCode::USD).is_zero());
    }

    #[test]
    fn test_times_is_exact() {
        let price = Price::from_cents(399, CurrencyCode::USD);
        assert_eq!(price.times(2).amount, Decimal::new(798, 2));
        assert!(price.times(0).is_zero());
    }

    #[test]
    fn test_times_and_plus_saturate() {
        let amount: Decimal = "100000000000000000000".parse().unwrap();
        let huge = Price::try_new(amount, CurrencyCode::USD).unwrap();
        assert_eq!(huge.times(u32::MAX).amount, Decimal::MAX);
        assert_eq!(huge.times(u32::MAX).plus(&huge).amount, Decimal::MAX);

        let small = Price::from_cents(150, CurrencyCode::USD);
        assert_eq!(small.plus(&small).amount, Decimal::new(300, 2));
    }

    #[test]
    fn test_currency_defaults_when_missing() {
        let price: Price = serde_json::from_str(r#"{"amount":"6.49"}"#).unwrap();
        assert_eq!(price.currency_code, CurrencyCode::USD);
        assert_eq!(price.amount, Decimal::new(649, 2));
    }
}
