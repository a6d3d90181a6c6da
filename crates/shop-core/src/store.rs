//! # Shop Store
//!
//! Persistence seam for the catalog, carts and the order ledger.
//!
//! Every method is one unit of work: it either applies all of its writes or
//! none of them. Composite operations (`commit_checkout`, `mark_paid`) exist
//! so that cart clearing and order changes can never be split.

use crate::address::Address;
use crate::cart::{CartItem, CheckoutSource};
use crate::coupon::Coupon;
use crate::error::{ShopError, ShopResult};
use crate::order::{MarkPaid, Order, OrderItem, OrderStatus, PaymentConfirmation};
use crate::product::{Product, ProductCatalog};
use crate::shipment::{Shipment, ShipmentInput, DELIVERED_SHIPMENT_STATUS};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything checkout writes, committed together
#[derive(Debug, Clone)]
pub struct NewCheckout {
    pub address: Address,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub source: CheckoutSource,
    pub coupon_code: Option<String>,
}

/// A received webhook whose signature verified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookLogEntry {
    pub gateway: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn product(&self, product_id: &str) -> ShopResult<Option<Product>>;

    async fn cart_items(&self, user_id: Uuid) -> ShopResult<Vec<CartItem>>;

    /// Add `quantity` of a product, incrementing an existing row
    async fn add_to_cart(&self, user_id: Uuid, product_id: &str, quantity: u32)
        -> ShopResult<CartItem>;

    /// Set a row's quantity, clamped to at least 1
    async fn update_cart_quantity(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: u32,
    ) -> ShopResult<CartItem>;

    async fn remove_from_cart(&self, user_id: Uuid, product_id: &str) -> ShopResult<bool>;

    /// Case-insensitive coupon lookup
    async fn coupon(&self, code: &str) -> ShopResult<Option<Coupon>>;

    /// Persist address, order, items and coupon usage, and clear the cart for
    /// cart checkouts. Rejects if the cart is now empty or no longer matches
    /// the priced snapshot.
    async fn commit_checkout(&self, checkout: NewCheckout) -> ShopResult<Order>;

    async fn order(&self, order_id: Uuid) -> ShopResult<Option<Order>>;

    async fn order_items(&self, order_id: Uuid) -> ShopResult<Vec<OrderItem>>;

    /// Newest first
    async fn orders_for_user(&self, user_id: Uuid) -> ShopResult<Vec<Order>>;

    async fn address(&self, address_id: Uuid) -> ShopResult<Option<Address>>;

    /// Record the settlement total and gateway order id together and move the
    /// order to `processing`.
    async fn attach_gateway_order(
        &self,
        order_id: Uuid,
        total: Decimal,
        gateway_order_id: &str,
    ) -> ShopResult<Order>;

    /// Compare-and-set on `is_paid` for the order owning `gateway_order_id`
    /// (current or superseded).
    /// The first caller flips it and clears the owner's cart; later callers
    /// observe `MarkPaid::AlreadyPaid`.
    async fn mark_paid(
        &self,
        gateway_order_id: &str,
        confirmation: PaymentConfirmation,
    ) -> ShopResult<(Order, MarkPaid)>;

    async fn cancel_order(&self, user_id: Uuid, order_id: Uuid) -> ShopResult<Order>;

    /// Fulfilment updates after shipping (delivered). Shipping itself goes
    /// through `ship_order` so tracking details are never missing.
    async fn advance_status(&self, order_id: Uuid, next: OrderStatus) -> ShopResult<Order>;

    /// Move a paid order to `shipped` and record its shipment together
    async fn ship_order(&self, order_id: Uuid, input: ShipmentInput) -> ShopResult<(Order, Shipment)>;

    /// Carrier status update for an existing shipment
    async fn update_shipment_status(&self, order_id: Uuid, status: &str) -> ShopResult<Shipment>;

    /// Shipment of one of `user_id`'s orders. Other users' orders are
    /// reported as not found.
    async fn shipment_for_user(&self, user_id: Uuid, order_id: Uuid) -> ShopResult<Shipment>;

    async fn record_webhook(&self, entry: WebhookLogEntry) -> ShopResult<()>;
}

/// Type alias for a shared store (dynamic dispatch)
pub type BoxedShopStore = Arc<dyn ShopStore>;

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<String, Product>,
    carts: HashMap<Uuid, Vec<CartItem>>,
    coupons: Vec<Coupon>,
    addresses: HashMap<Uuid, Address>,
    orders: HashMap<Uuid, Order>,
    order_items: HashMap<Uuid, Vec<OrderItem>>,
    shipments: HashMap<Uuid, Shipment>,
    webhooks: Vec<WebhookLogEntry>,
}

impl Tables {
    fn order_by_gateway_id(&mut self, gateway_order_id: &str) -> Option<&mut Order> {
        self.orders
            .values_mut()
            .find(|o| o.owns_gateway_order(gateway_order_id))
    }

    fn cart_snapshot(&self, user_id: Uuid) -> Vec<(String, u32)> {
        let mut snapshot: Vec<(String, u32)> = self
            .carts
            .get(&user_id)
            .map(|items| {
                items
                    .iter()
                    .map(|i| (i.product_id.clone(), i.quantity))
                    .collect()
            })
            .unwrap_or_default();
        snapshot.sort();
        snapshot
    }
}

/// Mutex-guarded in-memory store.
///
/// One lock serialises every operation, which gives each method
/// transaction semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a catalog
    pub fn with_catalog(catalog: ProductCatalog) -> Self {
        let tables = Tables {
            products: catalog
                .products
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    pub async fn add_product(&self, product: Product) {
        let mut tables = self.tables.lock().await;
        tables.products.insert(product.id.clone(), product);
    }

    pub async fn add_coupon(&self, coupon: Coupon) {
        let mut tables = self.tables.lock().await;
        tables.coupons.retain(|c| !c.matches(&coupon.code));
        tables.coupons.push(coupon);
    }

    pub async fn webhook_log(&self) -> Vec<WebhookLogEntry> {
        self.tables.lock().await.webhooks.clone()
    }
}

#[async_trait]
impl ShopStore for InMemoryStore {
    async fn product(&self, product_id: &str) -> ShopResult<Option<Product>> {
        Ok(self.tables.lock().await.products.get(product_id).cloned())
    }

    async fn cart_items(&self, user_id: Uuid) -> ShopResult<Vec<CartItem>> {
        Ok(self
            .tables
            .lock()
            .await
            .carts
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_to_cart(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: u32,
    ) -> ShopResult<CartItem> {
        let mut tables = self.tables.lock().await;
        if !tables.products.contains_key(product_id) {
            return Err(ShopError::ProductNotFound {
                product_id: product_id.to_string(),
            });
        }

        let cart = tables.carts.entry(user_id).or_default();
        if let Some(item) = cart.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = item.quantity.saturating_add(quantity.max(1));
            return Ok(item.clone());
        }

        let item = CartItem {
            user_id,
            product_id: product_id.to_string(),
            quantity: quantity.max(1),
            added_at: Utc::now(),
        };
        cart.push(item.clone());
        Ok(item)
    }

    async fn update_cart_quantity(
        &self,
        user_id: Uuid,
        product_id: &str,
        quantity: u32,
    ) -> ShopResult<CartItem> {
        let mut tables = self.tables.lock().await;
        let item = tables
            .carts
            .get_mut(&user_id)
            .and_then(|cart| cart.iter_mut().find(|i| i.product_id == product_id))
            .ok_or_else(|| ShopError::ProductNotFound {
                product_id: product_id.to_string(),
            })?;
        item.quantity = quantity.max(1);
        Ok(item.clone())
    }

    async fn remove_from_cart(&self, user_id: Uuid, product_id: &str) -> ShopResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(cart) = tables.carts.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = cart.len();
        cart.retain(|i| i.product_id != product_id);
        Ok(cart.len() != before)
    }

    async fn coupon(&self, code: &str) -> ShopResult<Option<Coupon>> {
        Ok(self
            .tables
            .lock()
            .await
            .coupons
            .iter()
            .find(|c| c.matches(code))
            .cloned())
    }

    async fn commit_checkout(&self, checkout: NewCheckout) -> ShopResult<Order> {
        let mut tables = self.tables.lock().await;
        let user_id = checkout.order.user_id;

        // Validate everything before the first write.
        if checkout.items.is_empty() {
            return Err(ShopError::EmptyCart);
        }
        if checkout.items.iter().any(|i| i.quantity == 0) {
            return Err(ShopError::InvalidRequest(
                "Order item quantity must be at least 1".to_string(),
            ));
        }

        if let CheckoutSource::Cart { snapshot } = &checkout.source {
            let current = tables.cart_snapshot(user_id);
            if current.is_empty() {
                return Err(ShopError::EmptyCart);
            }
            let mut priced = snapshot.clone();
            priced.sort();
            if current != priced {
                return Err(ShopError::InvalidRequest(
                    "Your cart changed during checkout. Please review it and try again."
                        .to_string(),
                ));
            }
        }

        let coupon_index = match &checkout.coupon_code {
            Some(code) => {
                let now = Utc::now();
                let index = tables
                    .coupons
                    .iter()
                    .position(|c| c.matches(code) && c.is_valid_at(now))
                    .ok_or_else(|| ShopError::InvalidCoupon { code: code.clone() })?;
                Some(index)
            }
            None => None,
        };

        // Writes
        let order = checkout.order;
        tables
            .addresses
            .insert(checkout.address.id, checkout.address);
        tables.order_items.insert(order.id, checkout.items);
        tables.orders.insert(order.id, order.clone());
        if let Some(index) = coupon_index {
            tables.coupons[index].used_count += 1;
        }
        if checkout.source.is_cart() {
            tables.carts.remove(&user_id);
            debug!(user_id = %user_id, "Cleared cart after checkout");
        }

        Ok(order)
    }

    async fn order(&self, order_id: Uuid) -> ShopResult<Option<Order>> {
        Ok(self.tables.lock().await.orders.get(&order_id).cloned())
    }

    async fn order_items(&self, order_id: Uuid) -> ShopResult<Vec<OrderItem>> {
        Ok(self
            .tables
            .lock()
            .await
            .order_items
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn orders_for_user(&self, user_id: Uuid) -> ShopResult<Vec<Order>> {
        let tables = self.tables.lock().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn address(&self, address_id: Uuid) -> ShopResult<Option<Address>> {
        Ok(self.tables.lock().await.addresses.get(&address_id).cloned())
    }

    async fn attach_gateway_order(
        &self,
        order_id: Uuid,
        total: Decimal,
        gateway_order_id: &str,
    ) -> ShopResult<Order> {
        let mut tables = self.tables.lock().await;
        let stored = tables
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;

        let mut updated = stored.clone();
        updated.set_total_price(total)?;
        updated.attach_gateway_order(gateway_order_id)?;
        *stored = updated.clone();

        info!(order_id = %order_id, gateway_order_id, "Attached gateway order");
        Ok(updated)
    }

    async fn mark_paid(
        &self,
        gateway_order_id: &str,
        confirmation: PaymentConfirmation,
    ) -> ShopResult<(Order, MarkPaid)> {
        let mut tables = self.tables.lock().await;
        let order = tables
            .order_by_gateway_id(gateway_order_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: gateway_order_id.to_string(),
            })?;

        let outcome = order.mark_paid(confirmation)?;
        let order = order.clone();
        if outcome == MarkPaid::Applied {
            tables.carts.remove(&order.user_id);
        }
        Ok((order, outcome))
    }

    async fn cancel_order(&self, user_id: Uuid, order_id: Uuid) -> ShopResult<Order> {
        let mut tables = self.tables.lock().await;
        let order = tables
            .orders
            .get_mut(&order_id)
            .filter(|o| o.user_id == user_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;
        order.cancel()?;
        Ok(order.clone())
    }

    async fn advance_status(&self, order_id: Uuid, next: OrderStatus) -> ShopResult<Order> {
        if next == OrderStatus::Shipped {
            return Err(ShopError::InvalidRequest(
                "Shipping an order requires tracking details".to_string(),
            ));
        }

        let mut tables = self.tables.lock().await;
        let order = tables
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;
        order.transition(next)?;
        let order = order.clone();

        if next == OrderStatus::Delivered {
            if let Some(shipment) = tables.shipments.get_mut(&order_id) {
                shipment.set_status(DELIVERED_SHIPMENT_STATUS)?;
            }
        }
        Ok(order)
    }

    async fn ship_order(&self, order_id: Uuid, input: ShipmentInput) -> ShopResult<(Order, Shipment)> {
        let shipment = input.into_shipment(order_id)?;

        let mut tables = self.tables.lock().await;
        let stored = tables
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;

        let mut updated = stored.clone();
        updated.transition(OrderStatus::Shipped)?;
        *stored = updated.clone();
        tables.shipments.insert(order_id, shipment.clone());

        info!(
            order_id = %order_id,
            carrier = %shipment.carrier,
            tracking_number = %shipment.tracking_number,
            "Order shipped"
        );
        Ok((updated, shipment))
    }

    async fn update_shipment_status(&self, order_id: Uuid, status: &str) -> ShopResult<Shipment> {
        let mut tables = self.tables.lock().await;
        let shipment = tables
            .shipments
            .get_mut(&order_id)
            .ok_or_else(|| ShopError::ShipmentNotFound {
                order_id: order_id.to_string(),
            })?;
        shipment.set_status(status)?;
        Ok(shipment.clone())
    }

    async fn shipment_for_user(&self, user_id: Uuid, order_id: Uuid) -> ShopResult<Shipment> {
        let tables = self.tables.lock().await;
        if !tables
            .orders
            .get(&order_id)
            .is_some_and(|o| o.user_id == user_id)
        {
            return Err(ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            });
        }
        tables
            .shipments
            .get(&order_id)
            .cloned()
            .ok_or_else(|| ShopError::ShipmentNotFound {
                order_id: order_id.to_string(),
            })
    }

    async fn record_webhook(&self, entry: WebhookLogEntry) -> ShopResult<()> {
        self.tables.lock().await.webhooks.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressInput;
    use crate::cart::CheckoutLine;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn address(user_id: Uuid) -> Address {
        AddressInput {
            full_name: "Asha Rao".into(),
            phone: "9876543210".into(),
            address_line1: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            postal_code: "560001".into(),
            ..AddressInput::default()
        }
        .into_shipping_address(user_id)
        .unwrap()
    }

    async fn seeded() -> (InMemoryStore, Uuid) {
        let store = InMemoryStore::new();
        store.add_product(Product::new("a", "A", dec("250.00"))).await;
        let user = Uuid::new_v4();
        store.add_to_cart(user, "a", 2).await.unwrap();
        (store, user)
    }

    fn cart_checkout(user: Uuid, snapshot: Vec<(String, u32)>) -> NewCheckout {
        let order = Order::new(user, dec("500.00"));
        let line = CheckoutLine {
            product_id: "a".into(),
            name: "A".into(),
            unit_price: dec("250.00"),
            quantity: 2,
        };
        NewCheckout {
            address: address(user),
            items: vec![OrderItem::from_line(order.id, &line)],
            order,
            source: CheckoutSource::Cart { snapshot },
            coupon_code: None,
        }
    }

    #[tokio::test]
    async fn test_cart_add_increments_and_update_clamps() {
        let (store, user) = seeded().await;

        let item = store.add_to_cart(user, "a", 3).await.unwrap();
        assert_eq!(item.quantity, 5);

        let item = store.update_cart_quantity(user, "a", 0).await.unwrap();
        assert_eq!(item.quantity, 1);

        assert!(store.remove_from_cart(user, "a").await.unwrap());
        assert!(store.cart_items(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let store = InMemoryStore::new();
        let err = store.add_to_cart(Uuid::new_v4(), "nope", 1).await.unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn test_commit_clears_cart_once() {
        let (store, user) = seeded().await;
        let snapshot = vec![("a".to_string(), 2)];

        let order = store
            .commit_checkout(cart_checkout(user, snapshot.clone()))
            .await
            .unwrap();
        assert!(store.cart_items(user).await.unwrap().is_empty());
        assert_eq!(store.order_items(order.id).await.unwrap().len(), 1);

        let err = store
            .commit_checkout(cart_checkout(user, snapshot))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));
        assert_eq!(store.orders_for_user(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_snapshot() {
        let (store, user) = seeded().await;

        let err = store
            .commit_checkout(cart_checkout(user, vec![("a".to_string(), 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::InvalidRequest(_)));
        assert_eq!(store.cart_items(user).await.unwrap().len(), 1);
        assert!(store.orders_for_user(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_coupon_rolls_back_everything() {
        let (store, user) = seeded().await;
        let mut checkout = cart_checkout(user, vec![("a".to_string(), 2)]);
        checkout.coupon_code = Some("NOPE".into());
        let address_id = checkout.address.id;

        let err = store.commit_checkout(checkout).await.unwrap_err();

        assert!(matches!(err, ShopError::InvalidCoupon { .. }));
        assert!(store.address(address_id).await.unwrap().is_none());
        assert_eq!(store.cart_items(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_paid_compare_and_set() {
        let (store, user) = seeded().await;
        let order = store
            .commit_checkout(cart_checkout(user, vec![("a".to_string(), 2)]))
            .await
            .unwrap();
        store
            .attach_gateway_order(order.id, dec("500.00"), "order_gw1")
            .await
            .unwrap();
        store.add_to_cart(user, "a", 1).await.unwrap();

        let confirmation = PaymentConfirmation {
            payment_id: "pay_1".into(),
            signature: None,
        };
        let (paid, first) = store.mark_paid("order_gw1", confirmation.clone()).await.unwrap();
        let (_, second) = store.mark_paid("order_gw1", confirmation).await.unwrap();

        assert_eq!(first, MarkPaid::Applied);
        assert_eq!(second, MarkPaid::AlreadyPaid);
        assert!(paid.is_paid());
        assert!(store.cart_items(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_gateway_order() {
        let store = InMemoryStore::new();
        let err = store
            .mark_paid(
                "order_missing",
                PaymentConfirmation {
                    payment_id: "pay_1".into(),
                    signature: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound { .. }));
    }

    async fn paid_order(store: &InMemoryStore, user: Uuid) -> Order {
        let order = store
            .commit_checkout(cart_checkout(user, vec![("a".to_string(), 2)]))
            .await
            .unwrap();
        store
            .attach_gateway_order(order.id, dec("500.00"), "order_gw1")
            .await
            .unwrap();
        let (order, _) = store
            .mark_paid(
                "order_gw1",
                PaymentConfirmation {
                    payment_id: "pay_1".into(),
                    signature: None,
                },
            )
            .await
            .unwrap();
        order
    }

    #[tokio::test]
    async fn test_ship_order_records_tracking() {
        let (store, user) = seeded().await;
        let order = paid_order(&store, user).await;

        let err = store.shipment_for_user(user, order.id).await.unwrap_err();
        assert!(matches!(err, ShopError::ShipmentNotFound { .. }));

        let (shipped, shipment) = store
            .ship_order(order.id, ShipmentInput::new("AWB123", "Delhivery"))
            .await
            .unwrap();
        assert_eq!(shipped.status(), OrderStatus::Shipped);
        assert_eq!(shipment.status, "Preparing");

        store
            .update_shipment_status(order.id, "In transit")
            .await
            .unwrap();
        let tracked = store.shipment_for_user(user, order.id).await.unwrap();
        assert_eq!(tracked.carrier, "Delhivery");
        assert_eq!(tracked.status, "In transit");

        let delivered = store
            .advance_status(order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(delivered.status(), OrderStatus::Delivered);
        assert_eq!(
            store.shipment_for_user(user, order.id).await.unwrap().status,
            "Delivered"
        );

        let err = store
            .shipment_for_user(Uuid::new_v4(), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unpaid_order_cannot_ship() {
        let (store, user) = seeded().await;
        let order = store
            .commit_checkout(cart_checkout(user, vec![("a".to_string(), 2)]))
            .await
            .unwrap();

        let err = store
            .ship_order(order.id, ShipmentInput::new("AWB123", "Delhivery"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidTransition { .. }));
        assert!(store.shipment_for_user(user, order.id).await.is_err());
        assert_eq!(
            store.order(order.id).await.unwrap().unwrap().status(),
            OrderStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_shipping_requires_tracking_details() {
        let (store, user) = seeded().await;
        let order = paid_order(&store, user).await;

        assert!(store
            .advance_status(order.id, OrderStatus::Shipped)
            .await
            .is_err());
        assert!(store
            .ship_order(order.id, ShipmentInput::new("", "Delhivery"))
            .await
            .is_err());
        assert_eq!(
            store.order(order.id).await.unwrap().unwrap().status(),
            OrderStatus::Paid
        );
    }

    #[tokio::test]
    async fn test_fulfilment_and_cancel() {
        let (store, user) = seeded().await;
        let order = store
            .commit_checkout(cart_checkout(user, vec![("a".to_string(), 2)]))
            .await
            .unwrap();

        assert!(store
            .advance_status(order.id, OrderStatus::Shipped)
            .await
            .is_err());

        let cancelled = store.cancel_order(user, order.id).await.unwrap();
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);

        let other_user = Uuid::new_v4();
        assert!(store.cancel_order(other_user, order.id).await.is_err());
    }
}
