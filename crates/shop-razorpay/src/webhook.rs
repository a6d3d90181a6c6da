//! # Razorpay Webhook Handling
//!
//! Decoding of verified webhook bodies into [`GatewayEvent`]s. Signature
//! checks happen before anything here runs.

use serde::Deserialize;
use shop_core::{GatewayEvent, ShopError, ShopResult};
use tracing::debug;

/// Header carrying the webhook body signature
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Event that settles an order
pub const PAYMENT_CAPTURED: &str = "payment.captured";

/// Events to enable on the Razorpay dashboard webhook.
///
/// Only `payment.captured` changes state; the rest are logged and acknowledged.
pub const SUBSCRIBED_WEBHOOK_EVENTS: &[&str] = &[PAYMENT_CAPTURED, "payment.failed", "order.paid"];

/// Top-level webhook body
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// `payload.payment.entity`
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    /// Payment id (pay_...)
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    /// Minor units
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentPayload {
    payment: EntityWrapper,
}

#[derive(Debug, Deserialize)]
struct EntityWrapper {
    entity: PaymentEntity,
}

impl PaymentEntity {
    /// Extract the payment entity from an envelope's payload
    pub fn from_payload(payload: &serde_json::Value) -> ShopResult<Self> {
        let wrapper: PaymentPayload = serde_json::from_value(payload.clone())
            .map_err(|e| ShopError::WebhookParse(format!("missing payment entity: {}", e)))?;
        Ok(wrapper.payment.entity)
    }
}

/// Decode a verified webhook body
pub fn parse_event(raw_body: &[u8]) -> ShopResult<GatewayEvent> {
    let raw: serde_json::Value = serde_json::from_slice(raw_body)
        .map_err(|e| ShopError::WebhookParse(format!("Invalid JSON: {}", e)))?;
    let envelope: WebhookEnvelope = serde_json::from_value(raw.clone())
        .map_err(|e| ShopError::WebhookParse(format!("Failed to parse webhook: {}", e)))?;

    debug!("Verified Razorpay webhook: event={}", envelope.event);

    if envelope.event != PAYMENT_CAPTURED {
        return Ok(GatewayEvent::Ignored {
            event: envelope.event,
            raw,
        });
    }

    let entity = PaymentEntity::from_payload(&envelope.payload)?;
    let gateway_order_id = entity
        .order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ShopError::WebhookParse("payment has no order_id".to_string()))?;

    Ok(GatewayEvent::PaymentCaptured {
        gateway_order_id,
        payment_id: entity.id,
        amount: entity.amount,
        currency: entity.currency,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn captured(order_id: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "entity": "event",
            "account_id": "acc_test",
            "event": "payment.captured",
            "created_at": 1_700_000_000,
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_29QQoUBi66xm2f",
                        "entity": "payment",
                        "amount": 59999,
                        "currency": "INR",
                        "status": "captured",
                        "order_id": order_id,
                        "method": "upi"
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_payment_captured() {
        let event = parse_event(&captured(json!("order_9A33XWu170gUtm"))).unwrap();

        match event {
            GatewayEvent::PaymentCaptured {
                gateway_order_id,
                payment_id,
                amount,
                currency,
                ..
            } => {
                assert_eq!(gateway_order_id, "order_9A33XWu170gUtm");
                assert_eq!(payment_id, "pay_29QQoUBi66xm2f");
                assert_eq!(amount, Some(59999));
                assert_eq!(currency.as_deref(), Some("INR"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_captured_without_order_id() {
        let err = parse_event(&captured(serde_json::Value::Null)).unwrap_err();
        assert!(matches!(err, ShopError::WebhookParse(_)));
    }

    #[test]
    fn test_other_events_are_ignored() {
        let body = br#"{"event":"payment.failed","payload":{}}"#;
        let event = parse_event(body).unwrap();
        assert_eq!(event.event_name(), "payment.failed");
        assert!(matches!(event, GatewayEvent::Ignored { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_event(b"{not json").unwrap_err();
        assert!(matches!(err, ShopError::WebhookParse(_)));
    }
}
