//! Cart pricing tests
//!
//! Tests for the pricing engine including:
//! - Store base price markdown
//! - Best-fit tier selection
//! - Cart aggregation and the representative plan
//! - Best plan selection across price plans

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    calculate_best_pricing, price_cart, round_currency, store_base_price, ActiveWindow,
    BestPlanStrategy, CartLine, CartQuote, DiscountPlan, PlanItemPrice, PricePlan, PricingRule,
    PricingStrategy, RuleCatalog, StrategyKind, TieredRateStrategy,
};
use std::str::FromStr;
use uuid::Uuid;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
}

fn discount_plan(name: &str) -> DiscountPlan {
    DiscountPlan {
        id: Uuid::new_v4(),
        name: name.to_string(),
        window: ActiveWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 2),
        ),
        is_active: true,
    }
}

fn rule(plan: &DiscountPlan, code: &str, min_quantity: i32, rate: &str) -> PricingRule {
    PricingRule {
        id: Uuid::new_v4(),
        plan_id: plan.id,
        product_code: code.to_string(),
        min_quantity,
        discount_rate: dec(rate),
        description: None,
    }
}

/// Rules {5 -> 10%, 10 -> 20%} for product "P-1"
fn volume_catalog() -> (DiscountPlan, RuleCatalog) {
    let plan = discount_plan("Nowruz volume");
    let catalog = RuleCatalog::new(
        [plan.clone()],
        [rule(&plan, "P-1", 5, "0.10"), rule(&plan, "P-1", 10, "0.20")],
    );
    (plan, catalog)
}

fn price_plan(name: &str, unit_price: &str) -> PricePlan {
    PricePlan {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        is_active: true,
        window: ActiveWindow::open_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        items: vec![PlanItemPrice {
            product_code: "P-1".to_string(),
            unit_price: dec(unit_price),
            max_quantity: None,
        }],
        tiers: vec![],
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod tiered_rate {
    use super::*;

    #[test]
    fn quantity_ten_gets_twenty_percent_not_ten() {
        let (_, catalog) = volume_catalog();
        let quote = price_cart(&catalog, &[CartLine::new("P-1", 10, dec("50000"))], as_of()).unwrap();

        let line = &quote.item_prices[0];
        assert_eq!(line.discount_rate(), dec("0.20"));
        assert_eq!(line.store_base_price, dec("43850"));
        assert_eq!(line.unit_price, dec("35080"));
    }

    #[test]
    fn quantity_four_gets_no_rule() {
        let (_, catalog) = volume_catalog();
        let quote = price_cart(&catalog, &[CartLine::new("P-1", 4, dec("50000"))], as_of()).unwrap();

        let line = &quote.item_prices[0];
        assert!(line.applied_rule.is_none());
        assert_eq!(line.discount_rate(), Decimal::ZERO);
        assert_eq!(line.unit_price, line.store_base_price);
        assert!(quote.applied_plan.is_none());
    }

    #[test]
    fn empty_cart_is_all_zero() {
        let (_, catalog) = volume_catalog();
        let quote = price_cart(&catalog, &[], as_of()).unwrap();
        assert_eq!(quote, CartQuote::empty());
    }

    #[test]
    fn final_amount_equals_subtotal() {
        let (_, catalog) = volume_catalog();
        let cart = vec![
            CartLine::new("P-1", 12, dec("50000")),
            CartLine::new("P-9", 1, dec("7000")),
        ];
        let quote = price_cart(&catalog, &cart, as_of()).unwrap();

        assert!(quote.discount > Decimal::ZERO);
        assert_eq!(quote.final_amount, quote.subtotal);
        assert_eq!(
            quote.subtotal,
            quote.item_prices.iter().map(|l| l.total_price).sum::<Decimal>()
        );
    }

    #[test]
    fn rules_outside_plan_window_do_not_apply() {
        let (_, catalog) = volume_catalog();
        let after_holiday = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        let quote =
            price_cart(&catalog, &[CartLine::new("P-1", 10, dec("50000"))], after_holiday).unwrap();
        assert!(quote.item_prices[0].applied_rule.is_none());
    }

    #[test]
    fn same_product_on_two_lines_is_priced_per_line() {
        let (_, catalog) = volume_catalog();
        let cart = vec![
            CartLine::new("P-1", 3, dec("50000")),
            CartLine::new("P-1", 3, dec("50000")),
        ];
        let quote = price_cart(&catalog, &cart, as_of()).unwrap();
        assert!(quote.item_prices.iter().all(|l| l.applied_rule.is_none()));
    }

    #[test]
    fn strategy_reports_its_kind() {
        let (_, catalog) = volume_catalog();
        assert_eq!(TieredRateStrategy::new(&catalog).kind(), StrategyKind::TieredRate);
        assert_eq!(BestPlanStrategy::new(&[]).kind(), StrategyKind::BestPlan);
    }
}

mod best_plan {
    use super::*;

    #[test]
    fn lower_final_amount_wins() {
        // 10 units: 9000 under the first plan, 8500 under the second
        let plans = vec![price_plan("Retail", "900"), price_plan("Wholesale", "850")];
        let cart = vec![CartLine::new("P-1", 10, dec("1200"))];

        let quote = calculate_best_pricing(&plans, &cart, as_of()).unwrap();
        assert_eq!(quote.final_amount, dec("8500"));
        assert_eq!(quote.applied_plan.unwrap().name.as_deref(), Some("Wholesale"));
        assert_eq!(quote.evaluated_plans.len(), 2);
    }

    #[test]
    fn both_strategies_share_one_interface() {
        let (_, catalog) = volume_catalog();
        let plans = vec![price_plan("Retail", "900")];
        let tiered = TieredRateStrategy::new(&catalog);
        let best = BestPlanStrategy::new(&plans);
        let strategies: Vec<&dyn PricingStrategy> = vec![&tiered, &best];

        let cart = vec![CartLine::new("P-1", 10, dec("1200"))];
        for strategy in strategies {
            let quote = strategy.quote(&cart, as_of()).unwrap();
            assert_eq!(quote.item_prices.len(), 1);
            assert_eq!(
                quote.applied_plan.map(|p| p.strategy),
                Some(strategy.kind())
            );
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..50_000_000).prop_map(Decimal::from)
    }

    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..500
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Base price is always the rounded 87.7% of the consumer price
        #[test]
        fn prop_store_base_price(price in price_strategy(), quantity in quantity_strategy()) {
            let (_, catalog) = volume_catalog();
            let quote = price_cart(&catalog, &[CartLine::new("P-1", quantity, price)], as_of()).unwrap();
            prop_assert_eq!(quote.item_prices[0].store_base_price, round_currency(price * dec("0.877")));
            prop_assert_eq!(store_base_price(price), round_currency(price * dec("0.877")));
        }

        /// Line discount equals (base - unit) * quantity
        #[test]
        fn prop_line_discount_amount(price in price_strategy(), quantity in quantity_strategy()) {
            let (_, catalog) = volume_catalog();
            let quote = price_cart(&catalog, &[CartLine::new("P-1", quantity, price)], as_of()).unwrap();
            let line = &quote.item_prices[0];
            prop_assert_eq!(
                line.discount_amount,
                round_currency((line.store_base_price - line.unit_price) * Decimal::from(quantity))
            );
            prop_assert_eq!(line.total_price, line.unit_price * Decimal::from(quantity));
        }

        /// The applied tier is the highest threshold not above the quantity
        #[test]
        fn prop_best_fit_tier(quantity in quantity_strategy()) {
            let (_, catalog) = volume_catalog();
            let quote = price_cart(&catalog, &[CartLine::new("P-1", quantity, dec("10000"))], as_of()).unwrap();
            let expected = match quantity {
                q if q >= 10 => Some(10),
                q if q >= 5 => Some(5),
                _ => None,
            };
            let applied = quote.item_prices[0].applied_rule.as_ref().map(|r| r.min_quantity);
            prop_assert_eq!(applied, expected);
        }

        /// Best plan never costs more than any single candidate
        #[test]
        fn prop_best_plan_is_minimum(
            prices in prop::collection::vec(100i64..10_000, 1..6),
            quantity in quantity_strategy()
        ) {
            let plans: Vec<PricePlan> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| price_plan(&format!("Plan {}", i), &p.to_string()))
                .collect();
            let cart = vec![CartLine::new("P-1", quantity, dec("20000"))];

            let quote = calculate_best_pricing(&plans, &cart, as_of()).unwrap();
            for evaluation in &quote.evaluated_plans {
                prop_assert!(quote.final_amount <= evaluation.final_amount);
            }
        }
    }
}
