//! # Checkout
//!
//! Turns a buy-now selection or the user's cart into a persisted order.
//! No gateway call happens here; see [`crate::payment`].

use crate::address::AddressInput;
use crate::cart::{CheckoutLine, CheckoutSession, CheckoutSource};
use crate::error::{ShopError, ShopResult};
use crate::money::{round_currency, Currency};
use crate::order::{Order, OrderItem};
use crate::product::Product;
use crate::store::{BoxedShopStore, NewCheckout};
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Checkout limits and currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Smallest order total accepted (default 1.00)
    pub minimum_order_total: Decimal,
    pub currency: Currency,
}

impl CheckoutSettings {
    /// Load from `SHOP_MIN_ORDER_TOTAL` and `SHOP_CURRENCY`, falling back to
    /// the defaults when unset.
    pub fn from_env() -> ShopResult<Self> {
        let mut settings = Self::default();

        if let Ok(raw) = std::env::var("SHOP_MIN_ORDER_TOTAL") {
            settings.minimum_order_total = Decimal::from_str(raw.trim()).map_err(|e| {
                ShopError::Configuration(format!("SHOP_MIN_ORDER_TOTAL is not a decimal: {}", e))
            })?;
        }
        if let Ok(raw) = std::env::var("SHOP_CURRENCY") {
            settings.currency = raw.parse()?;
        }

        Ok(settings)
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            minimum_order_total: Decimal::ONE,
            currency: Currency::INR,
        }
    }
}

/// Sum `price × quantity` per line and round half-up to 2 places
pub fn compute_total(lines: &[CheckoutLine]) -> Decimal {
    round_currency(lines.iter().map(CheckoutLine::total).sum())
}

fn ensure_purchasable(product: &Product) -> ShopResult<()> {
    if product.is_purchasable() {
        Ok(())
    } else {
        Err(ShopError::InvalidRequest(format!(
            "Product is not available: {}",
            product.id
        )))
    }
}

/// Checkout orchestrator
#[derive(Clone)]
pub struct CheckoutService {
    store: BoxedShopStore,
    settings: CheckoutSettings,
}

impl CheckoutService {
    pub fn new(store: BoxedShopStore, settings: CheckoutSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Create an order from the session's buy-now selection or the user's
    /// cart.
    ///
    /// On success the buy-now selection is cleared and the new order id is
    /// stored on the session. On any error nothing is persisted and the
    /// session is left untouched.
    #[instrument(skip(self, session, address))]
    pub async fn begin_checkout(
        &self,
        user_id: Uuid,
        session: &mut CheckoutSession,
        address: AddressInput,
    ) -> ShopResult<Order> {
        let (lines, source) = self.resolve_lines(user_id, session).await?;
        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let subtotal = compute_total(&lines);
        let (total, discount_percent) = self
            .apply_coupon(subtotal, session.coupon_code.as_deref())
            .await?;

        if total < self.settings.minimum_order_total {
            warn!(
                "Checkout below minimum: total={}, minimum={}",
                total, self.settings.minimum_order_total
            );
            return Err(ShopError::BelowMinimum {
                total,
                minimum: self.settings.minimum_order_total,
            });
        }

        let address = address.into_shipping_address(user_id)?;
        let order = Order::new(user_id, total)
            .with_shipping_address(address.id)
            .with_discount(discount_percent);
        let items = lines
            .iter()
            .map(|line| OrderItem::from_line(order.id, line))
            .collect();

        let order = self
            .store
            .commit_checkout(NewCheckout {
                address,
                order,
                items,
                source: source.clone(),
                coupon_code: discount_percent.and(session.coupon_code.clone()),
            })
            .await?;

        if source == CheckoutSource::BuyNow {
            session.buy_now = None;
        }
        session.order_id = Some(order.id);

        info!(
            "Created order {}: {} lines, total={}",
            order.id,
            lines.len(),
            self.settings.currency.display(order.total_price())
        );

        Ok(order)
    }

    async fn resolve_lines(
        &self,
        user_id: Uuid,
        session: &CheckoutSession,
    ) -> ShopResult<(Vec<CheckoutLine>, CheckoutSource)> {
        if let Some(selection) = &session.buy_now {
            let product = self
                .store
                .product(&selection.product_id)
                .await?
                .ok_or_else(|| ShopError::ProductNotFound {
                    product_id: selection.product_id.clone(),
                })?;
            ensure_purchasable(&product)?;
            if selection.quantity == 0 {
                return Err(ShopError::InvalidRequest(
                    "Quantity must be at least 1".to_string(),
                ));
            }
            let line = CheckoutLine {
                product_id: product.id,
                name: product.name,
                unit_price: selection.unit_price,
                quantity: selection.quantity,
            };
            return Ok((vec![line], CheckoutSource::BuyNow));
        }

        let cart = self.store.cart_items(user_id).await?;
        if cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart.len());
        let mut snapshot = Vec::with_capacity(cart.len());
        for item in &cart {
            let product = self
                .store
                .product(&item.product_id)
                .await?
                .ok_or_else(|| ShopError::ProductNotFound {
                    product_id: item.product_id.clone(),
                })?;
            ensure_purchasable(&product)?;
            snapshot.push((item.product_id.clone(), item.quantity));
            lines.push(CheckoutLine::from_product(&product, item.quantity));
        }

        Ok((lines, CheckoutSource::Cart { snapshot }))
    }

    /// Discount step. Runs before the minimum check.
    async fn apply_coupon(
        &self,
        subtotal: Decimal,
        code: Option<&str>,
    ) -> ShopResult<(Decimal, Option<u8>)> {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok((subtotal, None));
        };

        let coupon = self
            .store
            .coupon(code)
            .await?
            .filter(|c| c.is_valid_at(Utc::now()))
            .ok_or_else(|| ShopError::InvalidCoupon {
                code: code.to_string(),
            })?;

        Ok((coupon.apply(subtotal), Some(coupon.discount_percent)))
    }
}
