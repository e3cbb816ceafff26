//! Quantity-tier pricing: each line gets at most one rule, the highest threshold it reaches

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    cart_total, line_amount, store_base_price, PricingStrategy, RuleRepository, StrategyKind,
};
use crate::error::PricingError;
use crate::models::{AppliedPlan, AppliedRule, CartLine, CartQuote, PricedLine, PricingRule};
use crate::types::round_currency;
use crate::validation::validate_discount_rate;

/// Pick the qualifying rule with the highest `min_quantity`.
/// Equal thresholds from different plans resolve to the larger rate.
pub fn select_rule(rules: &[PricingRule], quantity: i32) -> Option<&PricingRule> {
    rules
        .iter()
        .filter(|rule| rule.qualifies(quantity))
        .fold(None, |best: Option<&PricingRule>, rule| match best {
            Some(current)
                if (current.min_quantity, current.discount_rate)
                    >= (rule.min_quantity, rule.discount_rate) =>
            {
                Some(current)
            }
            _ => Some(rule),
        })
}

/// Tiered rate strategy over a read-only rule repository
pub struct TieredRateStrategy<'a, R: RuleRepository + ?Sized> {
    rules: &'a R,
}

impl<'a, R: RuleRepository + ?Sized> TieredRateStrategy<'a, R> {
    pub fn new(rules: &'a R) -> Self {
        Self { rules }
    }

    /// Price one line against the rules active on `as_of`
    pub fn price_line(&self, line: &CartLine, as_of: NaiveDate) -> Result<PricedLine, PricingError> {
        let base_price = store_base_price(line.consumer_price);
        let rules = self.rules.active_rules(&line.product_code, as_of)?;
        let rule = select_rule(&rules, line.quantity);

        let discount_rate = rule.map_or(Decimal::ZERO, |r| r.discount_rate);
        validate_discount_rate(discount_rate)?;

        let unit_price = round_currency(base_price * (Decimal::ONE - discount_rate));
        let total_price = line_amount(unit_price, line.quantity, &line.product_code)?;
        let discount_amount = round_currency(line_amount(
            base_price - unit_price,
            line.quantity,
            &line.product_code,
        )?);

        Ok(PricedLine {
            product_code: line.product_code.clone(),
            quantity: line.quantity,
            consumer_price: line.consumer_price,
            store_base_price: base_price,
            unit_price,
            total_price,
            discount_amount,
            applied_rule: rule.map(|r| AppliedRule {
                rule_id: r.id,
                plan_id: r.plan_id,
                min_quantity: r.min_quantity,
                discount_rate: r.discount_rate,
                description: r.description.clone(),
            }),
        })
    }

    /// Plan of the line with the single highest rate; the first such line wins ties
    fn representative_plan(&self, lines: &[PricedLine]) -> Option<AppliedPlan> {
        let best = lines
            .iter()
            .filter_map(|line| line.applied_rule.as_ref())
            .fold(None, |best: Option<&AppliedRule>, rule| match best {
                Some(current) if current.discount_rate >= rule.discount_rate => Some(current),
                _ => Some(rule),
            })?;

        Some(AppliedPlan {
            plan_id: best.plan_id,
            name: self.rules.plan(best.plan_id).map(|plan| plan.name),
            description: best.description.clone(),
            discount_rate: Some(best.discount_rate),
            strategy: StrategyKind::TieredRate,
        })
    }
}

impl<R: RuleRepository + ?Sized> PricingStrategy for TieredRateStrategy<'_, R> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TieredRate
    }

    fn quote(&self, cart: &[CartLine], as_of: NaiveDate) -> Result<CartQuote, PricingError> {
        if cart.is_empty() {
            return Ok(CartQuote::empty());
        }

        let item_prices = cart
            .iter()
            .map(|line| self.price_line(line, as_of))
            .collect::<Result<Vec<_>, _>>()?;

        let subtotal = cart_total(item_prices.iter().map(|line| line.total_price))?;
        let discount = cart_total(item_prices.iter().map(|line| line.discount_amount))?;
        let applied_plan = self.representative_plan(&item_prices);

        // Line discounts are already inside unit prices, so the amount due is the subtotal.
        Ok(CartQuote {
            subtotal,
            discount,
            final_amount: subtotal,
            applied_plan,
            item_prices,
            evaluated_plans: Vec::new(),
        })
    }
}

/// Price a cart with the tiered rate strategy
pub fn price_cart<R: RuleRepository + ?Sized>(
    rules: &R,
    cart: &[CartLine],
    as_of: NaiveDate,
) -> Result<CartQuote, PricingError> {
    TieredRateStrategy::new(rules).quote(cart, as_of)
}
