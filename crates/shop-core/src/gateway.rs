//! # Payment Gateway Trait
//!
//! Seam between the checkout core and a hosted payment provider.
//! Implementations: Razorpay (`shop-razorpay`), plus test doubles.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          PaymentGateway (trait)             │
//! │  ├── create_remote_order()                  │
//! │  ├── verify_payment_signature()             │
//! │  ├── decode_webhook()                       │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//! ```

use crate::error::{ShopError, ShopResult};
use crate::money::{Currency, MIN_GATEWAY_AMOUNT_MINOR};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Amount to collect for one internal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOrderRequest {
    /// Minor units (paise)
    pub amount: i64,
    pub currency: Currency,
    /// Internal order reference echoed back by the provider
    pub receipt: String,
}

impl RemoteOrderRequest {
    /// Build a request for `total`, rejecting amounts the gateway cannot
    /// capture before any remote call is made.
    pub fn for_total(
        total: Decimal,
        currency: Currency,
        receipt: impl Into<String>,
    ) -> ShopResult<Self> {
        let amount = currency.to_minor_units(total)?;
        if amount < MIN_GATEWAY_AMOUNT_MINOR {
            return Err(ShopError::BelowGatewayMinimum {
                amount,
                minimum: MIN_GATEWAY_AMOUNT_MINOR,
            });
        }
        Ok(Self {
            amount,
            currency,
            receipt: receipt.into(),
        })
    }
}

/// Provider-side order created for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteOrder {
    /// Opaque gateway order id (e.g. "order_Mxyz...")
    pub id: String,
    pub amount: i64,
    pub currency: Currency,
}

/// A webhook that passed signature verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// `payment.captured`
    PaymentCaptured {
        gateway_order_id: String,
        payment_id: String,
        amount: Option<i64>,
        currency: Option<String>,
        raw: serde_json::Value,
    },
    /// Any other event; acknowledged without state change
    Ignored {
        event: String,
        raw: serde_json::Value,
    },
}

impl GatewayEvent {
    pub fn event_name(&self) -> &str {
        match self {
            GatewayEvent::PaymentCaptured { .. } => "payment.captured",
            GatewayEvent::Ignored { event, .. } => event,
        }
    }

    pub fn raw(&self) -> &serde_json::Value {
        match self {
            GatewayEvent::PaymentCaptured { raw, .. } | GatewayEvent::Ignored { raw, .. } => raw,
        }
    }
}

/// Core trait for payment provider adapters.
///
/// Credentials are bound at construction so tests can inject doubles.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a chargeable order on the provider.
    ///
    /// Fallible I/O; never retried here.
    async fn create_remote_order(&self, request: &RemoteOrderRequest) -> ShopResult<RemoteOrder>;

    /// Check the client-side callback signature over `order_id|payment_id`.
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Verify a webhook body against its signature header and decode it.
    ///
    /// Returns `ShopError::SignatureInvalid` without parsing on mismatch.
    fn decode_webhook(&self, raw_body: &[u8], signature: &str) -> ShopResult<GatewayEvent>;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;

    /// Public key handed to the client-side checkout widget
    fn public_key(&self) -> &str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
