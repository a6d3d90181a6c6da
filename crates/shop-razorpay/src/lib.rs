//! # shop-razorpay
//!
//! Razorpay payment gateway for the storefront checkout core.
//!
//! - **Orders API**: creates the remote order the checkout widget pays against
//! - **Callback signature**: HMAC-SHA256 over `order_id|payment_id`
//! - **Webhooks**: HMAC-SHA256 over the raw body, `payment.captured` decoding
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_razorpay::RazorpayGateway;
//! use shop_core::{PaymentGateway, RemoteOrderRequest};
//!
//! // Create gateway from environment
//! let gateway = RazorpayGateway::from_env()?;
//!
//! // Create the remote order for an internal order
//! let request = RemoteOrderRequest::for_total(order.total_price(), Currency::INR, order.id.to_string())?;
//! let remote = gateway.create_remote_order(&request).await?;
//!
//! // Hand remote.id and gateway.public_key() to the client widget
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! let signature = headers.get(shop_razorpay::SIGNATURE_HEADER);
//! let event = gateway.decode_webhook(&raw_body, signature)?;
//! ```

pub mod config;
pub mod orders;
pub mod signature;
pub mod webhook;

// Re-exports
pub use config::RazorpayConfig;
pub use orders::RazorpayGateway;
pub use webhook::{PaymentEntity, SIGNATURE_HEADER, SUBSCRIBED_WEBHOOK_EVENTS};
