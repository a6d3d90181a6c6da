//! # Shipments
//!
//! Carrier and tracking details for a shipped order. An order has at most
//! one shipment, recorded in the same step that moves it to `shipped`.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Status text of a freshly recorded shipment
pub const INITIAL_SHIPMENT_STATUS: &str = "Preparing";

/// Status text written when the order is delivered
pub const DELIVERED_SHIPMENT_STATUS: &str = "Delivered";

/// Tracking details supplied when an order ships
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShipmentInput {
    #[validate(length(min = 1, max = 100))]
    pub tracking_number: String,

    #[validate(length(min = 1, max = 100))]
    pub carrier: String,

    #[serde(default)]
    pub estimated_delivery: Option<NaiveDate>,
}

impl ShipmentInput {
    pub fn new(tracking_number: impl Into<String>, carrier: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            carrier: carrier.into(),
            estimated_delivery: None,
        }
    }

    pub fn with_estimated_delivery(mut self, date: NaiveDate) -> Self {
        self.estimated_delivery = Some(date);
        self
    }

    /// Validate and trim into a shipment for `order_id`
    pub fn into_shipment(self, order_id: Uuid) -> ShopResult<Shipment> {
        let trimmed = Self {
            tracking_number: self.tracking_number.trim().to_string(),
            carrier: self.carrier.trim().to_string(),
            estimated_delivery: self.estimated_delivery,
        };
        trimmed
            .validate()
            .map_err(|e| ShopError::InvalidRequest(format!("Invalid shipment: {}", e)))?;

        let now = Utc::now();
        Ok(Shipment {
            order_id,
            tracking_number: trimmed.tracking_number,
            carrier: trimmed.carrier,
            status: INITIAL_SHIPMENT_STATUS.to_string(),
            estimated_delivery: trimmed.estimated_delivery,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Persisted tracking record, one per order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub order_id: Uuid,
    pub tracking_number: String,
    pub carrier: String,
    /// Free-text carrier status ("Preparing", "In transit", ...)
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    pub fn set_status(&mut self, status: impl Into<String>) -> ShopResult<()> {
        let status = status.into().trim().to_string();
        if status.is_empty() || status.len() > 100 {
            return Err(ShopError::InvalidRequest(
                "Shipment status must be 1 to 100 characters".to_string(),
            ));
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shipment_is_preparing() {
        let order_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        let shipment = ShipmentInput::new(" AWB123456 ", "Delhivery")
            .with_estimated_delivery(date)
            .into_shipment(order_id)
            .unwrap();

        assert_eq!(shipment.order_id, order_id);
        assert_eq!(shipment.tracking_number, "AWB123456");
        assert_eq!(shipment.status, INITIAL_SHIPMENT_STATUS);
        assert_eq!(shipment.estimated_delivery, Some(date));
    }

    #[test]
    fn test_blank_tracking_rejected() {
        let err = ShipmentInput::new("  ", "Delhivery")
            .into_shipment(Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidRequest(_)));
    }

    #[test]
    fn test_set_status() {
        let mut shipment = ShipmentInput::new("AWB1", "BlueDart")
            .into_shipment(Uuid::new_v4())
            .unwrap();

        shipment.set_status("In transit").unwrap();
        assert_eq!(shipment.status, "In transit");
        assert!(shipment.set_status("   ").is_err());
        assert_eq!(shipment.status, "In transit");
    }
}
