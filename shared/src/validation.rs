//! Validation utilities for pricing data
//!
//! Client input comes from Persian-locale forms, so codes may carry
//! Persian or Arabic-Indic digits.

use rust_decimal::Decimal;

use crate::error::PricingError;
use crate::models::{PricePlan, PricingRule, TierDiscount};

// ============================================================================
// Input Normalization
// ============================================================================

/// Map Persian (۰-۹) and Arabic-Indic (٠-٩) digits to ASCII
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Trim and normalize a product code for lookup
pub fn normalize_product_code(code: &str) -> String {
    normalize_digits(code.trim())
}

// ============================================================================
// Rule Validations
// ============================================================================

/// Validate that a discount rate is a fraction in `[0, 1)`
pub fn validate_discount_rate(rate: Decimal) -> Result<(), PricingError> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(PricingError::InvalidRate {
            rate: rate.to_string(),
        });
    }
    Ok(())
}

/// Validate a stored tier rule before it enters a catalog
pub fn validate_pricing_rule(rule: &PricingRule) -> Result<(), &'static str> {
    if rule.product_code.trim().is_empty() {
        return Err("Rule product code cannot be empty");
    }
    if rule.min_quantity < 1 {
        return Err("Rule minimum quantity must be at least 1");
    }
    if validate_discount_rate(rule.discount_rate).is_err() {
        return Err("Rule discount rate must be in [0, 1)");
    }
    Ok(())
}

/// Validate a price plan's overrides and tiers
pub fn validate_price_plan(plan: &PricePlan) -> Result<(), &'static str> {
    if let Some(end) = plan.window.end_date {
        if end < plan.window.start_date {
            return Err("Plan end date is before its start date");
        }
    }
    for item in &plan.items {
        if item.unit_price < Decimal::ZERO {
            return Err("Plan unit price cannot be negative");
        }
        if item.max_quantity.is_some_and(|max| max < 1) {
            return Err("Plan quantity ceiling must be at least 1");
        }
    }
    for tier in &plan.tiers {
        if tier.min_total_quantity < 1 {
            return Err("Tier threshold must be at least 1");
        }
        match tier.discount {
            TierDiscount::Amount(amount) if amount < Decimal::ZERO => {
                return Err("Tier amount cannot be negative");
            }
            TierDiscount::Rate(rate) if validate_discount_rate(rate).is_err() => {
                return Err("Tier rate must be in [0, 1)");
            }
            _ => {}
        }
    }
    Ok(())
}
