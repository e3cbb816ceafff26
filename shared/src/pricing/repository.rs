//! Read-only access to discount plans and their rules

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::PricingError;
use crate::models::{DiscountPlan, PricingRule};
use crate::validation::normalize_product_code;

/// Read-only source of tier rules handed to the tiered calculator
pub trait RuleRepository {
    /// Rules for `product_code` whose plan is active on `as_of`, highest `min_quantity` first
    fn active_rules(
        &self,
        product_code: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<PricingRule>, PricingError>;

    /// Plan metadata, used when reporting the applied plan
    fn plan(&self, plan_id: Uuid) -> Option<DiscountPlan>;
}

/// In-memory rule repository, loaded once per request
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    plans: HashMap<Uuid, DiscountPlan>,
    rules_by_product: HashMap<String, Vec<PricingRule>>,
}

impl RuleCatalog {
    pub fn new(
        plans: impl IntoIterator<Item = DiscountPlan>,
        rules: impl IntoIterator<Item = PricingRule>,
    ) -> Self {
        let plans = plans.into_iter().map(|plan| (plan.id, plan)).collect();

        let mut rules_by_product: HashMap<String, Vec<PricingRule>> = HashMap::new();
        for mut rule in rules {
            rule.product_code = normalize_product_code(&rule.product_code);
            rules_by_product
                .entry(rule.product_code.clone())
                .or_default()
                .push(rule);
        }
        for rules in rules_by_product.values_mut() {
            rules.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));
        }

        Self {
            plans,
            rules_by_product,
        }
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules_by_product.values().map(Vec::len).sum()
    }
}

impl RuleRepository for RuleCatalog {
    fn active_rules(
        &self,
        product_code: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<PricingRule>, PricingError> {
        let Some(rules) = self.rules_by_product.get(product_code) else {
            return Ok(Vec::new());
        };

        Ok(rules
            .iter()
            .filter(|rule| {
                self.plans
                    .get(&rule.plan_id)
                    .is_some_and(|plan| plan.is_active_on(as_of))
            })
            .cloned()
            .collect())
    }

    fn plan(&self, plan_id: Uuid) -> Option<DiscountPlan> {
        self.plans.get(&plan_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActiveWindow;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan(is_active: bool, window: ActiveWindow) -> DiscountPlan {
        DiscountPlan {
            id: Uuid::new_v4(),
            name: "Nowruz".to_string(),
            window,
            is_active,
        }
    }

    fn rule(plan_id: Uuid, code: &str, min_quantity: i32) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            plan_id,
            product_code: code.to_string(),
            min_quantity,
            discount_rate: Decimal::new(5, 2),
            description: None,
        }
    }

    #[test]
    fn test_rules_sorted_by_threshold_descending() {
        let active = plan(true, ActiveWindow::open_from(date(2024, 1, 1)));
        let catalog = RuleCatalog::new(
            [active.clone()],
            [
                rule(active.id, "P-1", 5),
                rule(active.id, "P-1", 20),
                rule(active.id, "P-1", 10),
            ],
        );

        let thresholds: Vec<i32> = catalog
            .active_rules("P-1", date(2024, 6, 1))
            .unwrap()
            .iter()
            .map(|r| r.min_quantity)
            .collect();
        assert_eq!(thresholds, vec![20, 10, 5]);
        assert_eq!(catalog.rule_count(), 3);
    }

    #[test]
    fn test_inactive_and_out_of_window_plans_are_filtered() {
        let inactive = plan(false, ActiveWindow::open_from(date(2024, 1, 1)));
        let expired = plan(true, ActiveWindow::new(date(2024, 1, 1), Some(date(2024, 2, 1))));
        let future = plan(true, ActiveWindow::open_from(date(2025, 1, 1)));
        let current = plan(true, ActiveWindow::new(date(2024, 1, 1), Some(date(2024, 12, 31))));

        let catalog = RuleCatalog::new(
            [inactive.clone(), expired.clone(), future.clone(), current.clone()],
            [
                rule(inactive.id, "P-1", 1),
                rule(expired.id, "P-1", 2),
                rule(future.id, "P-1", 3),
                rule(current.id, "P-1", 4),
                rule(Uuid::new_v4(), "P-1", 5),
            ],
        );

        let rules = catalog.active_rules("P-1", date(2024, 6, 1)).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].plan_id, current.id);
    }

    #[test]
    fn test_unknown_product_has_no_rules() {
        let catalog = RuleCatalog::default();
        assert!(catalog.active_rules("P-404", date(2024, 1, 1)).unwrap().is_empty());
        assert!(catalog.plan(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_stored_codes_with_persian_digits_match_cart_codes() {
        let active = plan(true, ActiveWindow::open_from(date(2024, 1, 1)));
        let catalog = RuleCatalog::new([active.clone()], [rule(active.id, " P-۱۰۰ ", 5)]);

        let rules = catalog.active_rules("P-100", date(2024, 6, 1)).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].product_code, "P-100");
    }
}
