//! # Cart Types
//!
//! Persisted cart rows, the transient "buy now" selection, and the priced
//! lines checkout works from.

use crate::product::Product;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cart row, keyed by (user, product)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub user_id: Uuid,
    pub product_id: String,
    /// Always >= 1
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// Single product picked with "buy now", priced when it was picked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyNowSelection {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl BuyNowSelection {
    /// Capture the product's current price for a one-off purchase
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            quantity: quantity.max(1),
            unit_price: product.price,
        }
    }
}

/// Per-session checkout state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_now: Option<BuyNowSelection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,

    /// Order created by the last successful checkout, awaiting payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buy_now(mut self, selection: BuyNowSelection) -> Self {
        self.buy_now = Some(selection);
        self
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }
}

/// A priced line about to become an order item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CheckoutLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    /// Unrounded line total
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Where checkout lines came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutSource {
    /// Transient buy-now selection; cart is left alone
    BuyNow,
    /// The user's persisted cart, snapshotted as (product_id, quantity)
    Cart { snapshot: Vec<(String, u32)> },
}

impl CheckoutSource {
    pub fn is_cart(&self) -> bool {
        matches!(self, CheckoutSource::Cart { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_total() {
        let product = Product::new("a", "A", Decimal::from_str("250.00").unwrap());
        let line = CheckoutLine::from_product(&product, 2);

        assert_eq!(line.total(), Decimal::from_str("500.00").unwrap());
    }

    #[test]
    fn test_buy_now_captures_price_and_clamps_quantity() {
        let product = Product::new("a", "A", Decimal::from_str("10.50").unwrap());
        let selection = BuyNowSelection::from_product(&product, 0);

        assert_eq!(selection.quantity, 1);
        assert_eq!(selection.unit_price, Decimal::from_str("10.50").unwrap());
    }
}
