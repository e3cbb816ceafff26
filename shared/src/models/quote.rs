//! Priced cart output

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::StrategyKind;

/// The tier rule that priced a line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRule {
    pub rule_id: Uuid,
    pub plan_id: Uuid,
    pub min_quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_rate: Decimal,
    pub description: Option<String>,
}

/// A cart line after pricing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub product_code: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub consumer_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub store_base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    pub applied_rule: Option<AppliedRule>,
}

impl PricedLine {
    /// Discount rate of the applied rule, zero when none applied
    pub fn discount_rate(&self) -> Decimal {
        self.applied_rule
            .as_ref()
            .map_or(Decimal::ZERO, |rule| rule.discount_rate)
    }
}

/// Plan reported as applied to the whole cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPlan {
    pub plan_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub discount_rate: Option<Decimal>,
    pub strategy: StrategyKind,
}

/// Final amount of one plan considered by the best-plan strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanEvaluation {
    pub plan_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}

/// Cart-level pricing result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    pub applied_plan: Option<AppliedPlan>,
    pub item_prices: Vec<PricedLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluated_plans: Vec<PlanEvaluation>,
}

impl CartQuote {
    /// Zeroed quote returned for an empty cart
    pub fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            final_amount: Decimal::ZERO,
            applied_plan: None,
            item_prices: Vec::new(),
            evaluated_plans: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_prices.is_empty()
    }
}
