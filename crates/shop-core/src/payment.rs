//! # Payment Flow
//!
//! Drives an order through the gateway: remote order creation, the
//! synchronous client callback and the asynchronous webhook. Both paid
//! paths end in the store's compare-and-set, so duplicate or concurrent
//! notifications settle an order exactly once.

use crate::checkout::CheckoutSettings;
use crate::error::{ShopError, ShopResult};
use crate::gateway::{BoxedPaymentGateway, GatewayEvent, RemoteOrderRequest};
use crate::money::Currency;
use crate::order::{MarkPaid, Order, OrderStatus, PaymentConfirmation};
use crate::store::{BoxedShopStore, WebhookLogEntry};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// What the client-side checkout widget needs to collect payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub order_id: Uuid,
    pub razorpay_order_id: String,
    pub razorpay_key: String,
    /// Minor units
    pub amount: i64,
    pub amount_display: Decimal,
    pub currency: Currency,
}

/// Synchronous callback posted by the client after checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallback {
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

impl PaymentCallback {
    /// All three fields, each non-blank
    fn fields(&self) -> ShopResult<(&str, &str, &str)> {
        fn required<'a>(value: &'a Option<String>, name: &str) -> ShopResult<&'a str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ShopError::IncompletePayment(format!("missing {}", name)))
        }

        Ok((
            required(&self.razorpay_order_id, "razorpay_order_id")?,
            required(&self.razorpay_payment_id, "razorpay_payment_id")?,
            required(&self.razorpay_signature, "razorpay_signature")?,
        ))
    }
}

/// Result of a verified paid notification
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSettlement {
    pub order: Order,
    pub outcome: MarkPaid,
}

/// Result of processing a webhook
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// `payment.captured` for a known order
    Captured(PaymentSettlement),
    /// Verified but not an event we act on
    Ignored { event: String },
}

/// Payment orchestrator
#[derive(Clone)]
pub struct PaymentService {
    store: BoxedShopStore,
    gateway: BoxedPaymentGateway,
    settings: CheckoutSettings,
}

impl PaymentService {
    pub fn new(
        store: BoxedShopStore,
        gateway: BoxedPaymentGateway,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            store,
            gateway,
            settings,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.gateway.provider_name()
    }

    /// Create the gateway order for an unpaid order, or hand back the
    /// current one.
    ///
    /// The total is recomputed from the order's item snapshots first. When
    /// a gateway order already exists for that same total it is reused. A
    /// changed total gets a new gateway order, and the old id stays mapped
    /// to this order so a payment made against it still settles. If the
    /// gateway fails nothing is recorded and the call can be repeated.
    #[instrument(skip(self), fields(provider = self.gateway.provider_name()))]
    pub async fn initiate_payment(&self, user_id: Uuid, order_id: Uuid) -> ShopResult<PaymentIntent> {
        let order = self
            .store
            .order(order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or_else(|| ShopError::OrderNotFound {
                order_id: order_id.to_string(),
            })?;

        order.ensure_payable().map_err(|e| {
            warn!("Order {} is not payable: {}", order_id, e);
            e
        })?;

        let items = self.store.order_items(order_id).await?;
        if items.is_empty() {
            return Err(ShopError::InvalidRequest("Your order has no items.".to_string()));
        }

        let total = order.compute_total(&items);
        let request = RemoteOrderRequest::for_total(total, self.settings.currency, order_id.to_string())
            .map_err(|e| {
                warn!("Order amount too low for gateway: total={} ({})", total, e);
                e
            })?;

        if let Some(existing) = order.razorpay_order_id.as_deref() {
            if order.status() == OrderStatus::Processing && order.total_price() == total {
                info!(
                    "Reusing gateway order: order={}, gateway_order={}",
                    order.id, existing
                );
                return Ok(self.intent(&order, existing, &request));
            }
        }

        let remote = self.gateway.create_remote_order(&request).await.map_err(|e| {
            error!("Failed to create gateway order for {}: {}", order_id, e);
            e
        })?;

        let order = self
            .store
            .attach_gateway_order(order_id, total, &remote.id)
            .await?;

        info!(
            "Payment initiated: order={}, gateway_order={}, amount={}",
            order.id, remote.id, request.amount
        );

        Ok(self.intent(&order, &remote.id, &request))
    }

    fn intent(&self, order: &Order, gateway_order_id: &str, request: &RemoteOrderRequest) -> PaymentIntent {
        PaymentIntent {
            order_id: order.id,
            razorpay_order_id: gateway_order_id.to_string(),
            razorpay_key: self.gateway.public_key().to_string(),
            amount: request.amount,
            amount_display: order.total_price(),
            currency: request.currency,
        }
    }

    /// Handle the client-side success callback
    #[instrument(skip(self, callback), fields(gateway_order_id = ?callback.razorpay_order_id))]
    pub async fn confirm_payment(&self, callback: &PaymentCallback) -> ShopResult<PaymentSettlement> {
        let (gateway_order_id, payment_id, signature) = callback.fields()?;

        info!(
            "Received payment callback: order={}, payment={}",
            gateway_order_id, payment_id
        );

        if !self
            .gateway
            .verify_payment_signature(gateway_order_id, payment_id, signature)
        {
            warn!("Payment signature verification failed for {}", gateway_order_id);
            return Err(ShopError::SignatureInvalid(
                "payment signature mismatch".to_string(),
            ));
        }

        let confirmation = PaymentConfirmation {
            payment_id: payment_id.to_string(),
            signature: Some(signature.to_string()),
        };
        self.settle(gateway_order_id, confirmation).await
    }

    /// Handle a raw webhook delivery
    #[instrument(skip(self, raw_body, signature), fields(bytes = raw_body.len()))]
    pub async fn handle_webhook(&self, raw_body: &[u8], signature: &str) -> ShopResult<WebhookOutcome> {
        let event = self.gateway.decode_webhook(raw_body, signature).map_err(|e| {
            warn!("Rejected webhook: {}", e);
            e
        })?;

        self.store
            .record_webhook(WebhookLogEntry {
                gateway: self.gateway.provider_name().to_string(),
                event_type: event.event_name().to_string(),
                payload: event.raw().clone(),
                received_at: Utc::now(),
            })
            .await?;

        match event {
            GatewayEvent::PaymentCaptured {
                gateway_order_id,
                payment_id,
                ..
            } => {
                let confirmation = PaymentConfirmation {
                    payment_id,
                    signature: None,
                };
                let settlement = self.settle(&gateway_order_id, confirmation).await?;
                Ok(WebhookOutcome::Captured(settlement))
            }
            GatewayEvent::Ignored { event, .. } => {
                info!("Ignored webhook event: {}", event);
                Ok(WebhookOutcome::Ignored { event })
            }
        }
    }

    async fn settle(
        &self,
        gateway_order_id: &str,
        confirmation: PaymentConfirmation,
    ) -> ShopResult<PaymentSettlement> {
        let (order, outcome) = self
            .store
            .mark_paid(gateway_order_id, confirmation)
            .await
            .map_err(|e| {
                error!("Could not mark {} paid: {}", gateway_order_id, e);
                e
            })?;

        match outcome {
            MarkPaid::Applied => info!("Order {} marked paid", order.id),
            MarkPaid::AlreadyPaid => info!("Order {} was already paid", order.id),
        }

        Ok(PaymentSettlement { order, outcome })
    }
}
