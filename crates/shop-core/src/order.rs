//! # Order Types
//!
//! Orders, order items and the order status state machine.
//!
//! ```text
//! pending ──► processing ──► paid ──► shipped ──► delivered
//!    │  └──────────────────────▲
//!    └──► cancelled ◄── processing
//! ```

use crate::cart::CheckoutLine;
use crate::error::{ShopError, ShopResult};
use crate::money::{apply_discount, round_currency};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout, no payment started
    Pending,
    /// Gateway order created, awaiting payment
    Processing,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// No transitions leave a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Statuses an order with `is_paid == true` may hold
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Paid)
                | (Processing, Paid)
                | (Paid, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of an order. Created at checkout and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    /// Always >= 1
    pub quantity: u32,
    /// Price at checkout time; settlement never re-reads the catalog
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn from_line(order_id: Uuid, line: &CheckoutLine) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }

    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Proof of payment reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    /// Present on the client callback path, absent for webhooks
    pub signature: Option<String>,
}

/// Outcome of a paid transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPaid {
    /// This call flipped `is_paid` from false to true
    Applied,
    /// Already paid; nothing changed
    AlreadyPaid,
}

/// A persisted purchase.
///
/// Serialize-only: status, paid flag and total change only through the
/// transition methods, so an order cannot be rebuilt from arbitrary JSON.
///
/// ```compile_fail
/// let order: shop_core::Order = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    status: OrderStatus,
    is_paid: bool,
    total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    /// Earlier gateway orders for this order, replaced when the total changed.
    /// A payment against any of them still settles this order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub superseded_gateway_order_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending, unpaid order with generated ID
    pub fn new(user_id: Uuid, total_price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::Pending,
            is_paid: false,
            total_price: round_currency(total_price),
            discount_percent: None,
            shipping_address_id: None,
            razorpay_order_id: None,
            superseded_gateway_order_ids: Vec::new(),
            razorpay_payment_id: None,
            razorpay_signature: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_shipping_address(mut self, address_id: Uuid) -> Self {
        self.shipping_address_id = Some(address_id);
        self
    }

    pub fn with_discount(mut self, percent: Option<u8>) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Total implied by `items` and the stored discount
    pub fn compute_total(&self, items: &[OrderItem]) -> Decimal {
        let subtotal = round_currency(items.iter().map(OrderItem::total).sum());
        match self.discount_percent {
            Some(percent) => apply_discount(subtotal, percent),
            None => subtotal,
        }
    }

    /// Replace the total before payment. Fails once paid.
    pub fn set_total_price(&mut self, total: Decimal) -> ShopResult<()> {
        if self.is_paid {
            return Err(ShopError::AlreadyPaid {
                order_id: self.id.to_string(),
            });
        }
        self.total_price = round_currency(total);
        self.touch();
        Ok(())
    }

    /// Whether a payment may be started: unpaid and either `processing`
    /// already or allowed to move there.
    pub fn ensure_payable(&self) -> ShopResult<()> {
        if self.is_paid {
            return Err(ShopError::AlreadyPaid {
                order_id: self.id.to_string(),
            });
        }
        if self.status == OrderStatus::Processing {
            return Ok(());
        }
        self.ensure_transition(OrderStatus::Processing)
    }

    /// Record the gateway order and move to `processing`.
    ///
    /// Re-attaching while already processing makes the new id current and
    /// keeps the previous one in `superseded_gateway_order_ids`.
    pub fn attach_gateway_order(&mut self, gateway_order_id: impl Into<String>) -> ShopResult<()> {
        self.ensure_payable()?;
        let gateway_order_id = gateway_order_id.into();

        self.status = OrderStatus::Processing;
        match self.razorpay_order_id.replace(gateway_order_id.clone()) {
            Some(previous) if previous != gateway_order_id => {
                self.superseded_gateway_order_ids.push(previous);
            }
            _ => {}
        }
        self.touch();
        Ok(())
    }

    /// Current or superseded gateway order id belongs to this order
    pub fn owns_gateway_order(&self, gateway_order_id: &str) -> bool {
        self.razorpay_order_id.as_deref() == Some(gateway_order_id)
            || self
                .superseded_gateway_order_ids
                .iter()
                .any(|id| id == gateway_order_id)
    }

    /// Idempotent paid transition
    pub fn mark_paid(&mut self, confirmation: PaymentConfirmation) -> ShopResult<MarkPaid> {
        if self.is_paid {
            return Ok(MarkPaid::AlreadyPaid);
        }
        self.ensure_transition(OrderStatus::Paid)?;
        self.is_paid = true;
        self.status = OrderStatus::Paid;
        self.razorpay_payment_id = Some(confirmation.payment_id);
        if confirmation.signature.is_some() {
            self.razorpay_signature = confirmation.signature;
        }
        self.touch();
        Ok(MarkPaid::Applied)
    }

    /// Move to any non-paid status the state machine allows
    pub fn transition(&mut self, next: OrderStatus) -> ShopResult<()> {
        if next == OrderStatus::Paid {
            return Err(ShopError::InvalidRequest(
                "Orders are marked paid only by a verified payment".to_string(),
            ));
        }
        self.ensure_transition(next)?;
        self.status = next;
        self.touch();
        Ok(())
    }

    pub fn cancel(&mut self) -> ShopResult<()> {
        self.transition(OrderStatus::Cancelled)
    }

    fn ensure_transition(&self, next: OrderStatus) -> ShopResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(ShopError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn confirmation(id: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            payment_id: id.to_string(),
            signature: Some("sig".to_string()),
        }
    }

    #[test]
    fn test_transition_table() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Processing.can_transition_to(Cancelled));

        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Shipped.can_transition_to(Paid));
        assert!(Delivered.is_terminal());
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let mut order = Order::new(Uuid::new_v4(), dec("599.99"));
        order.attach_gateway_order("order_abc").unwrap();

        assert_eq!(order.mark_paid(confirmation("pay_1")).unwrap(), MarkPaid::Applied);
        assert_eq!(
            order.mark_paid(confirmation("pay_2")).unwrap(),
            MarkPaid::AlreadyPaid
        );

        assert!(order.is_paid());
        assert_eq!(order.status(), OrderStatus::Paid);
        assert_eq!(order.razorpay_payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn test_paid_total_is_frozen() {
        let mut order = Order::new(Uuid::new_v4(), dec("10.00"));
        order.set_total_price(dec("12.345")).unwrap();
        assert_eq!(order.total_price(), dec("12.35"));

        order.mark_paid(confirmation("pay_1")).unwrap();
        assert!(order.set_total_price(dec("1.00")).is_err());
        assert!(order.attach_gateway_order("order_late").is_err());
        assert_eq!(order.total_price(), dec("12.35"));
    }

    #[test]
    fn test_reattach_keeps_superseded_gateway_ids() {
        let mut order = Order::new(Uuid::new_v4(), dec("10.00"));
        order.attach_gateway_order("order_gw1").unwrap();
        order.attach_gateway_order("order_gw1").unwrap();
        order.attach_gateway_order("order_gw2").unwrap();

        assert_eq!(order.razorpay_order_id.as_deref(), Some("order_gw2"));
        assert_eq!(order.superseded_gateway_order_ids, vec!["order_gw1".to_string()]);
        assert!(order.owns_gateway_order("order_gw1"));
        assert!(order.owns_gateway_order("order_gw2"));
        assert!(!order.owns_gateway_order("order_gw3"));
    }

    #[test]
    fn test_cancelled_order_is_not_payable() {
        let mut order = Order::new(Uuid::new_v4(), dec("10.00"));
        assert!(order.ensure_payable().is_ok());
        order.cancel().unwrap();

        let err = order.ensure_payable().unwrap_err();
        assert!(matches!(
            err,
            ShopError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Processing
            }
        ));
        assert!(order.attach_gateway_order("order_gw1").is_err());
        assert!(order.razorpay_order_id.is_none());
    }

    #[test]
    fn test_cancelled_order_cannot_be_paid() {
        let mut order = Order::new(Uuid::new_v4(), dec("10.00"));
        order.cancel().unwrap();

        let err = order.mark_paid(confirmation("pay_1")).unwrap_err();
        assert!(matches!(err, ShopError::InvalidTransition { .. }));
        assert!(!order.is_paid());
    }

    #[test]
    fn test_paid_only_through_mark_paid() {
        let mut order = Order::new(Uuid::new_v4(), dec("10.00"));
        assert!(order.transition(OrderStatus::Paid).is_err());
        assert!(order.transition(OrderStatus::Shipped).is_err());
    }

    #[test]
    fn test_compute_total_uses_snapshots_and_discount() {
        let order_id = Uuid::new_v4();
        let items = vec![
            OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: "a".into(),
                quantity: 2,
                unit_price: dec("250.00"),
            },
            OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: "b".into(),
                quantity: 1,
                unit_price: dec("99.99"),
            },
        ];

        let order = Order::new(Uuid::new_v4(), dec("599.99"));
        assert_eq!(order.compute_total(&items), dec("599.99"));

        let discounted = order.with_discount(Some(10));
        assert_eq!(discounted.compute_total(&items), dec("539.99"));
    }
}
