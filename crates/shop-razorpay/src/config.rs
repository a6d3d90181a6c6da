//! # Razorpay Configuration
//!
//! Credentials and endpoint for the Razorpay integration.
//! All secrets are loaded from environment variables.

use shop_core::ShopError;
use std::env;

/// Production API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (rzp_test_... or rzp_live_...), also handed to the client widget
    pub key_id: String,

    /// API key secret; signs the payment callback
    pub key_secret: String,

    /// Secret configured on the dashboard webhook; signs webhook bodies
    pub webhook_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    /// - `RAZORPAY_WEBHOOK_SECRET`
    ///
    /// Optional: `RAZORPAY_API_BASE_URL`
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();

        let key_id = required("RAZORPAY_KEY_ID")?;
        let key_secret = required("RAZORPAY_KEY_SECRET")?;
        let webhook_secret = required("RAZORPAY_WEBHOOK_SECRET")?;

        if !key_id.starts_with("rzp_test_") && !key_id.starts_with("rzp_live_") {
            return Err(ShopError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        let mut config = Self::new(key_id, key_secret, webhook_secret);
        if let Ok(url) = env::var("RAZORPAY_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            webhook_secret: webhook_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.api_base_url)
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"***")
            .field("webhook_secret", &"***")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn required(name: &str) -> Result<String, ShopError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ShopError::Configuration(format!("{} not set", name)))
}
