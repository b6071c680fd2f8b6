//! Type-safe price representation using decimal arithmetic.
//!
//! All money in the storefront flows through [`Price`] for display so the
//! cart, checkout, and confirmation pages format amounts identically:
//! currency symbol followed by exactly two decimal places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., ringgit, not sen).
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

    /// Create a price in Malaysian ringgit, the storefront's currency.
    #[must_use]
    pub const fn myr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::MYR)
    }

    /// Format for display with exactly two decimal places (e.g., "RM3.00").
    #[must_use]
    pub fn display(&self) -> String {
        let mut amount = self.amount.round_dp(2);
        amount.rescale(2);
        format!("{}{amount}", self.currency_code.symbol())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    MYR,
    SGD,
    USD,
}

impl CurrencyCode {
    /// The symbol prefixed to displayed amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::MYR => "RM",
            Self::SGD | Self::USD => "$",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MYR => "MYR",
            Self::SGD => "SGD",
            Self::USD => "USD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        let price = Price::myr(Decimal::new(3, 0));
        assert_eq!(price.display(), "RM3.00");
    }

    #[test]
    fn test_display_keeps_two_decimals() {
        let price = Price::myr(Decimal::new(1250, 2));
        assert_eq!(price.display(), "RM12.50");
    }

    #[test]
    fn test_display_rounds_excess_precision() {
        // 20.00 * 0.07 = 1.4000, four decimal places internally
        let price = Price::myr(Decimal::new(14_000, 4));
        assert_eq!(price.display(), "RM1.40");
    }

    #[test]
    fn test_display_zero() {
        let price = Price::myr(Decimal::ZERO);
        assert_eq!(price.display(), "RM0.00");
    }

    #[test]
    fn test_other_currency_symbol() {
        let price = Price::new(Decimal::new(500, 2), CurrencyCode::SGD);
        assert_eq!(price.display(), "$5.00");
        assert_eq!(CurrencyCode::SGD.code(), "SGD");
    }
}
