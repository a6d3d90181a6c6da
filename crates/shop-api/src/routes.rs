//! # Routes
//!
//! Axum router configuration for the storefront payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Payment:
///   - POST /payment/handler - Checkout widget success callback
///   - POST /api/v1/orders/{order_id}/payment - Create the Razorpay order
///   - GET  /api/v1/orders/{order_id} - Order with items
///   - GET  /api/v1/orders/{order_id}/shipment - Shipment tracking
///
/// - Webhooks:
///   - POST /webhook/razorpay - Razorpay webhook handler
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new().route("/handler", post(handlers::payment_callback));

    let api_routes = Router::new()
        .route("/orders/{order_id}", get(handlers::get_order))
        .route("/orders/{order_id}/payment", post(handlers::initiate_payment))
        .route("/orders/{order_id}/shipment", get(handlers::get_shipment));

    // Raw body, no JSON extractor
    let webhook_routes = Router::new().route("/razorpay", post(handlers::razorpay_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/payment", payment_routes)
        .nest("/api/v1", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
