//! # Razorpay Orders
//!
//! [`PaymentGateway`] implementation over the Razorpay Orders API.
//! The client-side checkout widget collects payment against the order
//! created here.

use crate::config::RazorpayConfig;
use crate::signature;
use crate::webhook;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shop_core::{
    Currency, GatewayEvent, PaymentGateway, RemoteOrder, RemoteOrderRequest, ShopError,
    ShopResult,
};
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "razorpay";

/// Razorpay gateway
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new gateway with a 30s request timeout
    pub fn new(config: RazorpayConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(RazorpayConfig::from_env()?)
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, request), fields(receipt = %request.receipt, amount = request.amount))]
    async fn create_remote_order(&self, request: &RemoteOrderRequest) -> ShopResult<RemoteOrder> {
        let body = CreateOrderBody {
            amount: request.amount,
            currency: request.currency.as_str(),
            receipt: &request.receipt,
            payment_capture: "1",
        };

        debug!("Creating Razorpay order: amount={}", request.amount);

        let response = self
            .client
            .post(self.config.orders_url())
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, text);

            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.description)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, text));

            return Err(ShopError::Gateway {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        let order: OrderResponse = serde_json::from_str(&text).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })?;

        let currency = order.currency.parse::<Currency>().unwrap_or_else(|_| {
            warn!("Unexpected currency in Razorpay response: {}", order.currency);
            request.currency
        });

        info!("Created Razorpay order: id={}, status={}", order.id, order.status);

        Ok(RemoteOrder {
            id: order.id,
            amount: order.amount,
            currency,
        })
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let message = signature::payment_message(order_id, payment_id);
        signature::verify(&self.config.key_secret, message.as_bytes(), signature)
    }

    fn decode_webhook(&self, raw_body: &[u8], signature: &str) -> ShopResult<GatewayEvent> {
        if !signature::verify(&self.config.webhook_secret, raw_body, signature) {
            return Err(ShopError::SignatureInvalid(
                "webhook signature mismatch".to_string(),
            ));
        }
        webhook::parse_event(raw_body)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn public_key(&self) -> &str {
        &self.config.key_id
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: &'static str,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<String>,
    description: String,
}
