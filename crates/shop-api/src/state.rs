//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the checkout and payment services, the store behind them, and
//! server configuration.

use anyhow::Context;
use shop_core::{
    BoxedPaymentGateway, BoxedShopStore, CheckoutService, CheckoutSettings, InMemoryStore,
    PaymentService, ProductCatalog,
};
use shop_razorpay::RazorpayGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the storefront
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub checkout: CheckoutService,
    pub payments: PaymentService,
    pub store: BoxedShopStore,
    pub config: AppConfig,
}

impl AppState {
    /// Build from the environment: Razorpay credentials, checkout limits and
    /// the product catalog seed.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let settings = CheckoutSettings::from_env()
            .map_err(|e| anyhow::anyhow!("Invalid checkout settings: {}", e))?;

        let catalog = load_product_catalog()?;
        tracing::info!("Products loaded: {}", catalog.products.len());
        let store: BoxedShopStore = Arc::new(InMemoryStore::with_catalog(catalog));

        let gateway = RazorpayGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;
        if gateway.config().is_live_mode() && !config.is_production() {
            tracing::warn!("Live Razorpay keys in a {} environment", config.environment);
        }

        Ok(Self::from_parts(config, store, Arc::new(gateway), settings))
    }

    /// Assemble from explicit parts (tests, alternative stores)
    pub fn from_parts(
        config: AppConfig,
        store: BoxedShopStore,
        gateway: BoxedPaymentGateway,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            checkout: CheckoutService::new(store.clone(), settings.clone()),
            payments: PaymentService::new(store.clone(), gateway, settings),
            store,
            config,
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path))?;
            tracing::info!("Loaded catalog from {}", path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog found, using empty catalog");
    Ok(ProductCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("BASE_URL");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..config
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_repo_catalog_parses() {
        let content = include_str!("../../../config/products.toml");
        let catalog = ProductCatalog::from_toml(content).unwrap();
        assert!(catalog.active_products().count() > 0);
    }
}
