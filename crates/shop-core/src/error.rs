//! # Shop Error Types
//!
//! Typed error handling for the checkout and payment core.
//! All store, gateway and orchestration operations return `Result<T, ShopError>`.

use crate::order::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse error classes used at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input; nothing was mutated
    Validation,
    /// Signature mismatch or incomplete payment proof
    Authentication,
    /// Unknown order or product
    NotFound,
    /// Remote gateway call failed; safe to retry
    TransientIo,
    /// Anything unexpected
    Internal,
}

/// Core error type for all checkout and payment operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing to check out
    #[error("Your cart is empty")]
    EmptyCart,

    /// Order total under the configured minimum
    #[error("Minimum order amount must be {minimum}, got {total}")]
    BelowMinimum { total: Decimal, minimum: Decimal },

    /// Amount under the smallest capturable gateway amount
    #[error("Amount of {amount} minor units is below the gateway minimum of {minimum}")]
    BelowGatewayMinimum { amount: i64, minimum: i64 },

    /// Shipping address failed validation
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Coupon unknown, inactive, expired or exhausted
    #[error("Invalid coupon: {code}")]
    InvalidCoupon { code: String },

    /// Order state machine rejected a transition
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Payment was already captured for this order
    #[error("Order {order_id} is already paid")]
    AlreadyPaid { order_id: String },

    /// Payment or webhook signature did not verify
    #[error("Signature verification failed: {0}")]
    SignatureInvalid(String),

    /// Callback was missing one of the payment fields
    #[error("Incomplete payment details: {0}")]
    IncompletePayment(String),

    /// Verified webhook body could not be decoded
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// No order for the given internal or gateway id
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    /// Order exists but has not shipped yet
    #[error("No shipment information available for order {order_id}")]
    ShipmentNotFound { order_id: String },

    /// Product not present in the catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Gateway answered with an error
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error talking to the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Taxonomy class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::InvalidRequest(_)
            | ShopError::EmptyCart
            | ShopError::BelowMinimum { .. }
            | ShopError::BelowGatewayMinimum { .. }
            | ShopError::InvalidAddress(_)
            | ShopError::InvalidCoupon { .. }
            | ShopError::InvalidTransition { .. }
            | ShopError::AlreadyPaid { .. }
            | ShopError::WebhookParse(_) => ErrorKind::Validation,
            ShopError::SignatureInvalid(_) | ShopError::IncompletePayment(_) => {
                ErrorKind::Authentication
            }
            ShopError::OrderNotFound { .. }
            | ShopError::ShipmentNotFound { .. }
            | ShopError::ProductNotFound { .. } => ErrorKind::NotFound,
            ShopError::Gateway { .. } | ShopError::Network(_) => ErrorKind::TransientIo,
            ShopError::Configuration(_) | ShopError::Serialization(_) | ShopError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::TransientIo
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Gateway { .. } => 502,
            ShopError::Network(_) => 503,
            _ => match self.kind() {
                ErrorKind::Validation | ErrorKind::Authentication => 400,
                ErrorKind::NotFound => 404,
                ErrorKind::TransientIo | ErrorKind::Internal => 500,
            },
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Transient and internal failures collapse to generic text.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::TransientIo => {
                "Something went wrong while contacting the payment provider. Please try again."
                    .to_string()
            }
            ErrorKind::Internal => "Internal error".to_string(),
            ErrorKind::Authentication => match self {
                ShopError::IncompletePayment(_) => "Incomplete payment details.".to_string(),
                _ => "Invalid signature".to_string(),
            },
            ErrorKind::Validation | ErrorKind::NotFound => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
