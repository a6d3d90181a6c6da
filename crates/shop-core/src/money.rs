//! # Money
//!
//! Fixed-point currency arithmetic. Amounts are `Decimal` with two decimal
//! places; the gateway wants integer minor units (paise for INR).

use crate::error::{ShopError, ShopResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decimal places kept on every stored amount
pub const CURRENCY_DECIMALS: u32 = 2;

/// Smallest amount the gateway will capture, in minor units
pub const MIN_GATEWAY_AMOUNT_MINOR: i64 = 100;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the ISO 4217 currency code as the gateway expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }

    /// Convert a decimal amount to minor units (×100, round-half-up)
    pub fn to_minor_units(&self, amount: Decimal) -> ShopResult<i64> {
        (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(|| {
                ShopError::InvalidRequest(format!("Amount {} is out of range", amount))
            })
    }

    /// Convert minor units back to a two-place decimal
    pub fn from_minor_units(&self, amount: i64) -> Decimal {
        Decimal::new(amount, CURRENCY_DECIMALS)
    }

    /// Format for display (e.g., "₹599.99")
    pub fn display(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.symbol(), round_currency(amount))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::INR),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            other => Err(ShopError::Configuration(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

/// Round to two decimal places, half away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage discount multiplicatively and round
pub fn apply_discount(subtotal: Decimal, percent: u8) -> Decimal {
    let keep = Decimal::from(100u32.saturating_sub(u32::from(percent)));
    round_currency(subtotal * keep / Decimal::ONE_HUNDRED)
}
