//! # Addresses
//!
//! Shipping/billing address input as submitted at checkout, validated at
//! the boundary before anything is persisted.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Shipping,
    Billing,
}

impl Default for AddressType {
    fn default() -> Self {
        AddressType::Shipping
    }
}

/// Address form submitted with a checkout. Checkout only collects the
/// shipping address, so the form carries no address type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddressInput {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(length(min = 1, max = 15))]
    pub phone: String,

    #[validate(length(min = 1, max = 255))]
    pub address_line1: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub address_line2: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,

    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,

    #[serde(default)]
    pub is_default: bool,
}

impl AddressInput {
    /// Validate and trim into a persistable address for `user_id`.
    ///
    /// Checkout always stores the address as a shipping address.
    pub fn into_shipping_address(self, user_id: Uuid) -> ShopResult<Address> {
        let trimmed = self.trimmed();
        trimmed
            .validate()
            .map_err(|e| ShopError::InvalidAddress(e.to_string()))?;

        Ok(Address {
            id: Uuid::new_v4(),
            user_id,
            address_type: AddressType::Shipping,
            full_name: trimmed.full_name,
            phone: trimmed.phone,
            address_line1: trimmed.address_line1,
            address_line2: trimmed.address_line2.filter(|l| !l.is_empty()),
            city: trimmed.city,
            state: trimmed.state,
            country: trimmed.country,
            postal_code: trimmed.postal_code,
            is_default: trimmed.is_default,
        })
    }

    fn trimmed(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.address_line2.map(|l| l.trim().to_string()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            is_default: self.is_default,
        }
    }
}

/// A persisted address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_type: AddressType,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_default: bool,
}

impl Address {
    /// Single-line rendering for order pages and invoices
    pub fn display_line(&self) -> String {
        let mut parts = vec![self.full_name.as_str(), self.address_line1.as_str()];
        if let Some(line2) = &self.address_line2 {
            parts.push(line2);
        }
        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]);
        parts.join(", ")
    }
}
