//! Price plans compared by the best-plan strategy

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{round_currency, ActiveWindow};

/// A named set of unit-price overrides plus cart-level tier discounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(flatten)]
    pub window: ActiveWindow,
    #[serde(default)]
    pub items: Vec<PlanItemPrice>,
    #[serde(default)]
    pub tiers: Vec<PlanTier>,
}

/// Fixed unit price for a product while the line quantity stays at or below `max_quantity`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanItemPrice {
    pub product_code: String,
    pub unit_price: Decimal,
    /// No ceiling when absent
    pub max_quantity: Option<i32>,
}

impl PlanItemPrice {
    pub fn applies_to(&self, quantity: i32) -> bool {
        self.max_quantity.map_or(true, |max| quantity <= max)
    }
}

/// Cart-level discount unlocked by the total quantity across all lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanTier {
    pub min_total_quantity: i32,
    pub discount: TierDiscount,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TierDiscount {
    /// Flat amount in rial
    Amount(Decimal),
    /// Fraction of the plan subtotal
    Rate(Decimal),
}

impl TierDiscount {
    /// Discount on `subtotal`, never more than the subtotal itself
    pub fn amount_for(&self, subtotal: Decimal) -> Decimal {
        let amount = match self {
            TierDiscount::Amount(amount) => *amount,
            // A product out of range is only possible for rates outside [0, 1]
            TierDiscount::Rate(rate) => match subtotal.checked_mul(*rate) {
                Some(amount) => round_currency(amount),
                None if rate.is_sign_negative() => Decimal::ZERO,
                None => subtotal,
            },
        };
        amount.max(Decimal::ZERO).min(subtotal.max(Decimal::ZERO))
    }
}

impl PricePlan {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.window.contains(date)
    }

    /// The qualifying override for a product with the tightest ceiling
    pub fn item_price_for(&self, product_code: &str, quantity: i32) -> Option<&PlanItemPrice> {
        self.items
            .iter()
            .filter(|item| item.product_code == product_code && item.applies_to(quantity))
            .min_by_key(|item| item.max_quantity.unwrap_or(i32::MAX))
    }

    /// Highest tier whose threshold the cart reaches
    pub fn tier_for(&self, total_quantity: i64) -> Option<&PlanTier> {
        self.tiers
            .iter()
            .filter(|tier| total_quantity >= i64::from(tier.min_total_quantity))
            .max_by_key(|tier| tier.min_total_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn plan() -> PricePlan {
        PricePlan {
            id: Uuid::new_v4(),
            name: "Wholesale".to_string(),
            description: None,
            is_active: true,
            window: ActiveWindow::open_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            items: vec![
                PlanItemPrice {
                    product_code: "P-1".to_string(),
                    unit_price: dec("900"),
                    max_quantity: Some(10),
                },
                PlanItemPrice {
                    product_code: "P-1".to_string(),
                    unit_price: dec("950"),
                    max_quantity: None,
                },
            ],
            tiers: vec![
                PlanTier {
                    min_total_quantity: 10,
                    discount: TierDiscount::Amount(dec("500")),
                },
                PlanTier {
                    min_total_quantity: 50,
                    discount: TierDiscount::Rate(dec("0.05")),
                },
            ],
        }
    }

    #[test]
    fn test_item_price_prefers_tightest_ceiling() {
        let plan = plan();
        assert_eq!(plan.item_price_for("P-1", 5).unwrap().unit_price, dec("900"));
        assert_eq!(plan.item_price_for("P-1", 10).unwrap().unit_price, dec("900"));
        assert_eq!(plan.item_price_for("P-1", 11).unwrap().unit_price, dec("950"));
        assert!(plan.item_price_for("P-2", 1).is_none());
    }

    #[test]
    fn test_tier_selection_takes_highest_reached() {
        let plan = plan();
        assert!(plan.tier_for(9).is_none());
        assert_eq!(plan.tier_for(10).unwrap().min_total_quantity, 10);
        assert_eq!(plan.tier_for(49).unwrap().min_total_quantity, 10);
        assert_eq!(plan.tier_for(50).unwrap().min_total_quantity, 50);
    }

    #[test]
    fn test_tier_discount_amounts() {
        assert_eq!(TierDiscount::Amount(dec("500")).amount_for(dec("10000")), dec("500"));
        assert_eq!(TierDiscount::Amount(dec("500")).amount_for(dec("300")), dec("300"));
        assert_eq!(TierDiscount::Rate(dec("0.05")).amount_for(dec("10010")), dec("501"));

        let huge = dec("70000000000000000000000000000");
        assert_eq!(TierDiscount::Rate(dec("5")).amount_for(huge), huge);
        assert_eq!(TierDiscount::Rate(dec("-5")).amount_for(huge), Decimal::ZERO);
    }

    #[test]
    fn test_tier_discount_wire_format() {
        let json = serde_json::to_value(TierDiscount::Rate(dec("0.05"))).unwrap();
        assert_eq!(json["kind"], "rate");
        let parsed: TierDiscount =
            serde_json::from_str(r#"{ "kind": "amount", "value": 2500 }"#).unwrap();
        assert_eq!(parsed, TierDiscount::Amount(dec("2500")));
    }
}
