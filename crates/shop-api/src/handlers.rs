//! # Request Handlers
//!
//! Axum request handlers for the payment callback, the Razorpay webhook and
//! order payment. Every handler answers with a JSON body; errors never
//! escape as bare status codes.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use shop_core::{
    ErrorKind, MarkPaid, Order, OrderItem, OrderStatus, PaymentCallback, PaymentIntent, Shipment,
    ShopError, WebhookOutcome,
};
use shop_razorpay::SIGNATURE_HEADER;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Header carrying the authenticated user id, set by the session layer in
/// front of this service
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// Request/Response Types
// =============================================================================

/// `{status, message?, event?}` body used by the payment endpoints
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl StatusResponse {
    pub fn new(status: &'static str) -> Self {
        Self {
            status,
            message: None,
            event: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error").with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}

type ApiError = (StatusCode, Json<StatusResponse>);

/// Order with its items
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Tracking details for one of the caller's orders
#[derive(Debug, Serialize)]
pub struct ShipmentResponse {
    pub order_id: Uuid,
    pub order_status: OrderStatus,
    pub shipment: Shipment,
}

fn status_of(err: &ShopError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Map a failed payment notification to its JSON reply
fn payment_error_to_response(err: &ShopError) -> ApiError {
    let message = match err.kind() {
        ErrorKind::NotFound => "Order not found.".to_string(),
        ErrorKind::Internal => "Internal error".to_string(),
        _ => err.public_message(),
    };
    (status_of(err), Json(StatusResponse::error(message)))
}

fn user_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(StatusResponse::error("Authentication required")),
            )
        })
}

fn order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(StatusResponse::error("Order not found.")),
        )
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Client-side checkout success callback
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn payment_callback(State(state): State<AppState>, body: Bytes) -> ApiError {
    let callback: PaymentCallback = match serde_json::from_slice(&body) {
        Ok(callback) => callback,
        Err(e) => {
            warn!("Invalid JSON in payment callback: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse::error("Invalid JSON")),
            );
        }
    };

    match state.payments.confirm_payment(&callback).await {
        Ok(settlement) => {
            let response = match settlement.outcome {
                MarkPaid::Applied => StatusResponse::new("success"),
                MarkPaid::AlreadyPaid => {
                    StatusResponse::new("success").with_message("Order already marked as paid.")
                }
            };
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            error!("Payment callback failed: {}", e);
            payment_error_to_response(&e)
        }
    }
}

/// Razorpay webhook; the signature covers the raw body, so it is read as bytes
#[instrument(skip(state, headers, body), fields(bytes = body.len()))]
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiError {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Webhook without {} header", SIGNATURE_HEADER);
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::error("Invalid signature")),
        );
    };

    match state.payments.handle_webhook(&body, signature).await {
        Ok(WebhookOutcome::Captured(settlement)) => {
            info!(
                "Payment captured via webhook for order {} ({:?})",
                settlement.order.id, settlement.outcome
            );
            (StatusCode::OK, Json(StatusResponse::new("ok")))
        }
        Ok(WebhookOutcome::Ignored { event }) => (
            StatusCode::OK,
            Json(StatusResponse::new("ignored").with_event(event)),
        ),
        Err(e) => {
            error!("Webhook error: {}", e);
            match e.kind() {
                ErrorKind::Internal => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusResponse::error("Webhook processing failed")),
                ),
                _ => payment_error_to_response(&e),
            }
        }
    }
}

/// Create the Razorpay order for one of the caller's orders
#[instrument(skip(state, headers))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_order_id): Path<String>,
) -> Result<Json<PaymentIntent>, ApiError> {
    let user_id = user_id(&headers)?;
    let order_id = order_id(&raw_order_id)?;

    let intent = state
        .payments
        .initiate_payment(user_id, order_id)
        .await
        .map_err(|e| {
            error!("Failed to initiate payment: {}", e);
            (status_of(&e), Json(StatusResponse::error(e.public_message())))
        })?;

    Ok(Json(intent))
}

/// Get one of the caller's orders with its items
#[instrument(skip(state, headers))]
pub async fn get_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let user_id = user_id(&headers)?;
    let order_id = order_id(&raw_order_id)?;

    let internal = |e: ShopError| {
        error!("Failed to load order {}: {}", order_id, e);
        (status_of(&e), Json(StatusResponse::error(e.public_message())))
    };

    let order = state
        .store
        .order(order_id)
        .await
        .map_err(internal)?
        .filter(|o| o.user_id == user_id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(StatusResponse::error("Order not found.")),
            )
        })?;
    let items = state.store.order_items(order_id).await.map_err(internal)?;

    Ok(Json(OrderResponse { order, items }))
}

/// Shipment tracking for one of the caller's orders
#[instrument(skip(state, headers))]
pub async fn get_shipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_order_id): Path<String>,
) -> Result<Json<ShipmentResponse>, ApiError> {
    let user_id = user_id(&headers)?;
    let order_id = order_id(&raw_order_id)?;

    let to_response = |e: ShopError| {
        let message = match e {
            ShopError::OrderNotFound { .. } => "Order not found.".to_string(),
            ShopError::ShipmentNotFound { .. } => "No shipment information available.".to_string(),
            _ => {
                error!("Failed to load shipment for {}: {}", order_id, e);
                e.public_message()
            }
        };
        (status_of(&e), Json(StatusResponse::error(message)))
    };

    let shipment = state
        .store
        .shipment_for_user(user_id, order_id)
        .await
        .map_err(to_response)?;
    let order = state
        .store
        .order(order_id)
        .await
        .map_err(to_response)?
        .ok_or_else(|| to_response(ShopError::OrderNotFound {
            order_id: order_id.to_string(),
        }))?;

    Ok(Json(ShipmentResponse {
        order_id,
        order_status: order.status(),
        shipment,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_shape() {
        let body = serde_json::to_value(StatusResponse::new("ok")).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "ok" }));

        let body =
            serde_json::to_value(StatusResponse::new("ignored").with_event("refund.created"))
                .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "status": "ignored", "event": "refund.created" })
        );
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, Json(body)) = payment_error_to_response(&ShopError::OrderNotFound {
            order_id: "order_x".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message.as_deref(), Some("Order not found."));

        let (status, Json(body)) =
            payment_error_to_response(&ShopError::SignatureInvalid("mismatch".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message.as_deref(), Some("Invalid signature"));

        let (status, Json(body)) =
            payment_error_to_response(&ShopError::Internal("lock poisoned".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message.as_deref(), Some("Internal error"));
    }

    #[test]
    fn test_user_id_header() {
        let mut headers = HeaderMap::new();
        assert!(user_id(&headers).is_err());

        let id = Uuid::new_v4();
        headers.insert(USER_ID_HEADER, id.to_string().parse().unwrap());
        assert_eq!(user_id(&headers).unwrap(), id);
    }
}
