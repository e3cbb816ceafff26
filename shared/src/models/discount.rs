//! Discount plans and quantity-tier rules

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ActiveWindow;

/// A named, time-bounded group of pricing rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPlan {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub window: ActiveWindow,
    pub is_active: bool,
}

impl DiscountPlan {
    /// Active flag set and `date` inside the plan window
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.window.contains(date)
    }
}

/// Quantity threshold rule: buying at least `min_quantity` of a product earns `discount_rate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub product_code: String,
    pub min_quantity: i32,
    /// Fraction of the store base price, 0.2 = 20%
    pub discount_rate: Decimal,
    pub description: Option<String>,
}

impl PricingRule {
    pub fn qualifies(&self, quantity: i32) -> bool {
        quantity >= self.min_quantity
    }
}

/// Discount plan together with its rules, as listed on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPlanSummary {
    #[serde(flatten)]
    pub plan: DiscountPlan,
    pub rules: Vec<PricingRule>,
}
