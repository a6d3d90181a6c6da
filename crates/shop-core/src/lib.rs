//! # shop-core
//!
//! Core types and services for the storefront checkout engine.
//!
//! This crate provides:
//! - `ProductCatalog`, cart rows and the `CheckoutSession`
//! - `CheckoutService` for turning a cart or buy-now selection into an order
//! - `PaymentGateway` trait for implementing payment providers
//! - `PaymentService` for the callback and webhook paid paths
//! - `Shipment` tracking for fulfilled orders
//! - `ShopStore` trait with an in-memory implementation
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CheckoutService, CheckoutSession, PaymentService};
//!
//! // Create the order from the user's cart
//! let mut session = CheckoutSession::new();
//! let order = checkout.begin_checkout(user_id, &mut session, address).await?;
//!
//! // Create the gateway order and hand the intent to the client widget
//! let intent = payments.initiate_payment(user_id, order.id).await?;
//!
//! // Later: the client callback or the webhook settles the order
//! payments.confirm_payment(&callback).await?;
//! ```

pub mod address;
pub mod cart;
pub mod checkout;
pub mod coupon;
pub mod error;
pub mod gateway;
pub mod money;
pub mod order;
pub mod payment;
pub mod product;
pub mod shipment;
pub mod store;

// Re-exports for convenience
pub use address::{Address, AddressInput, AddressType};
pub use cart::{BuyNowSelection, CartItem, CheckoutLine, CheckoutSession, CheckoutSource};
pub use checkout::{compute_total, CheckoutService, CheckoutSettings};
pub use coupon::Coupon;
pub use error::{ErrorKind, ShopError, ShopResult};
pub use gateway::{BoxedPaymentGateway, GatewayEvent, PaymentGateway, RemoteOrder, RemoteOrderRequest};
pub use money::{Currency, MIN_GATEWAY_AMOUNT_MINOR};
pub use order::{MarkPaid, Order, OrderItem, OrderStatus, PaymentConfirmation};
pub use payment::{PaymentCallback, PaymentIntent, PaymentService, PaymentSettlement, WebhookOutcome};
pub use product::{Product, ProductCatalog};
pub use shipment::{Shipment, ShipmentInput};
pub use store::{BoxedShopStore, InMemoryStore, NewCheckout, ShopStore, WebhookLogEntry};
