//! # shop-api
//!
//! HTTP API layer for the storefront checkout core.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The Razorpay checkout callback and webhook endpoints
//! - Order payment initiation and lookup
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payment/handler` | Checkout widget success callback |
//! | POST | `/webhook/razorpay` | Razorpay webhook |
//! | POST | `/api/v1/orders/{order_id}/payment` | Create Razorpay order |
//! | GET | `/api/v1/orders/{order_id}` | Get order |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
