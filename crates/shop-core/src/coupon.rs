//! # Coupons
//!
//! Percentage coupons applied to the checkout subtotal before the minimum
//! amount check.

use crate::money::apply_discount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique, matched case-insensitively
    pub code: String,
    /// In [1, 100]
    pub discount_percent: u8,
    #[serde(default = "default_true")]
    pub active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
}

fn default_true() -> bool {
    true
}

impl Coupon {
    pub fn new(
        code: impl Into<String>,
        discount_percent: u8,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            discount_percent: discount_percent.clamp(1, 100),
            active: true,
            valid_from,
            valid_to,
            usage_limit: None,
            used_count: 0,
        }
    }

    pub fn with_usage_limit(mut self, limit: u32) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Active, inside its window and under its usage cap at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.active
            && (1..=100).contains(&self.discount_percent)
            && self.valid_from <= now
            && now <= self.valid_to
            && self.usage_limit.map_or(true, |limit| self.used_count < limit)
    }

    pub fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Discounted, rounded total for `subtotal`
    pub fn apply(&self, subtotal: Decimal) -> Decimal {
        apply_discount(subtotal, self.discount_percent)
    }
}
