//! # Product Types
//!
//! Catalog types. The catalog is owned elsewhere and read-only to checkout;
//! the binary seeds it from `config/products.toml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (slug-like, e.g. "cotton-kurta-blue")
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Current list price
    pub price: Decimal,

    #[serde(default)]
    pub stock: u32,

    /// Whether this product can be purchased
    #[serde(default = "default_true")]
    pub is_available: bool,

    #[serde(default)]
    pub is_archived: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create an available product with the given price
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: None,
            price,
            stock: 0,
            is_available: true,
            is_archived: false,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder: set stock
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Whether checkout may include this product
    pub fn is_purchasable(&self) -> bool {
        self.is_available && !self.is_archived
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get all purchasable products
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_purchasable())
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_product_builder() {
        let product = Product::new("kurta", "Cotton Kurta", Decimal::from_str("799.00").unwrap())
            .with_description("Hand-loomed")
            .with_category("apparel")
            .with_stock(12);

        assert_eq!(product.id, "kurta");
        assert_eq!(product.category.as_deref(), Some("apparel"));
        assert_eq!(product.stock, 12);
        assert!(product.is_purchasable());
    }

    #[test]
    fn test_catalog_from_toml() {
        let catalog = ProductCatalog::from_toml(
            r#"
            [[products]]
            id = "mug"
            name = "Steel Mug"
            price = "249.50"

            [[products]]
            id = "old-mug"
            name = "Old Mug"
            price = "99.99"
            is_archived = true
            "#,
        )
        .unwrap();

        assert_eq!(catalog.products.len(), 2);
        assert_eq!(
            catalog.get("mug").unwrap().price,
            Decimal::from_str("249.50").unwrap()
        );
        assert_eq!(catalog.active_products().count(), 1);
        assert!(catalog.get("missing").is_none());
    }
}
