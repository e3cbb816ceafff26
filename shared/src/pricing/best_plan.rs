//! Plan-versus-plan pricing: price the cart under every candidate plan and keep the cheapest

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{cart_total, line_amount, store_base_price, PricingStrategy, StrategyKind};
use crate::error::PricingError;
use crate::models::{AppliedPlan, CartLine, CartQuote, PlanEvaluation, PricePlan, PricedLine};
use crate::types::round_currency;

/// Cart priced under a single plan
#[derive(Debug, Clone)]
pub struct PlanQuote<'p> {
    pub plan: Option<&'p PricePlan>,
    pub item_prices: Vec<PricedLine>,
    pub subtotal: Decimal,
    pub line_discount: Decimal,
    pub tier_discount: Decimal,
    /// Line discounts plus the tier discount
    pub discount: Decimal,
    pub final_amount: Decimal,
}

impl PlanQuote<'_> {
    fn into_cart_quote(self, evaluated_plans: Vec<PlanEvaluation>) -> CartQuote {
        let applied_plan = self.plan.map(|plan| AppliedPlan {
            plan_id: plan.id,
            name: Some(plan.name.clone()),
            description: plan.description.clone(),
            discount_rate: None,
            strategy: StrategyKind::BestPlan,
        });

        CartQuote {
            subtotal: self.subtotal,
            discount: self.discount,
            final_amount: self.final_amount,
            applied_plan,
            item_prices: self.item_prices,
            evaluated_plans,
        }
    }

    fn evaluation(&self) -> Option<PlanEvaluation> {
        self.plan.map(|plan| PlanEvaluation {
            plan_id: plan.id,
            name: plan.name.clone(),
            subtotal: self.subtotal,
            discount: self.discount,
            final_amount: self.final_amount,
        })
    }
}

fn price_line(plan: Option<&PricePlan>, line: &CartLine) -> Result<PricedLine, PricingError> {
    let base_price = store_base_price(line.consumer_price);
    let unit_price = plan
        .and_then(|plan| plan.item_price_for(&line.product_code, line.quantity))
        .map_or(base_price, |item| round_currency(item.unit_price));

    let total_price = line_amount(unit_price, line.quantity, &line.product_code)?;
    let discount_amount =
        round_currency(line_amount(base_price - unit_price, line.quantity, &line.product_code)?)
            .max(Decimal::ZERO);

    Ok(PricedLine {
        product_code: line.product_code.clone(),
        quantity: line.quantity,
        consumer_price: line.consumer_price,
        store_base_price: base_price,
        unit_price,
        total_price,
        discount_amount,
        applied_rule: None,
    })
}

/// Price `cart` under `plan`; `None` prices every line at the store base price
pub fn evaluate_plan<'p>(
    plan: Option<&'p PricePlan>,
    cart: &[CartLine],
) -> Result<PlanQuote<'p>, PricingError> {
    let item_prices = cart
        .iter()
        .map(|line| price_line(plan, line))
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal = cart_total(item_prices.iter().map(|line| line.total_price))?;
    let line_discount = cart_total(item_prices.iter().map(|line| line.discount_amount))?;
    let total_quantity: i64 = cart.iter().map(|line| i64::from(line.quantity)).sum();

    let tier_discount = plan
        .and_then(|plan| plan.tier_for(total_quantity))
        .map_or(Decimal::ZERO, |tier| tier.discount.amount_for(subtotal));

    Ok(PlanQuote {
        plan,
        item_prices,
        subtotal,
        line_discount,
        tier_discount,
        discount: cart_total([line_discount, tier_discount])?,
        final_amount: subtotal - tier_discount,
    })
}

/// Best plan strategy over a set of candidate price plans
pub struct BestPlanStrategy<'a> {
    plans: &'a [PricePlan],
    only_active: bool,
}

impl<'a> BestPlanStrategy<'a> {
    /// Compare the plans in effect on the quote date
    pub fn new(plans: &'a [PricePlan]) -> Self {
        Self {
            plans,
            only_active: true,
        }
    }

    /// Compare exactly `plans`, whatever their dates or active flag
    pub fn selected(plans: &'a [PricePlan]) -> Self {
        Self {
            plans,
            only_active: false,
        }
    }
}

impl PricingStrategy for BestPlanStrategy<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BestPlan
    }

    fn quote(&self, cart: &[CartLine], as_of: NaiveDate) -> Result<CartQuote, PricingError> {
        if cart.is_empty() {
            return Ok(CartQuote::empty());
        }

        let candidates = self
            .plans
            .iter()
            .filter(|plan| !self.only_active || plan.is_active_on(as_of))
            .map(|plan| evaluate_plan(Some(plan), cart))
            .collect::<Result<Vec<_>, _>>()?;

        let evaluated_plans: Vec<PlanEvaluation> =
            candidates.iter().filter_map(PlanQuote::evaluation).collect();

        // Strictly lower wins, so the earlier plan keeps ties.
        let best = candidates.into_iter().fold(None, |best: Option<PlanQuote<'_>>, quote| {
            match best {
                Some(current) if current.final_amount <= quote.final_amount => Some(current),
                _ => Some(quote),
            }
        });

        let best = match best {
            Some(best) => best,
            None => evaluate_plan(None, cart)?,
        };
        Ok(best.into_cart_quote(evaluated_plans))
    }
}

/// Price a cart under every active plan and return the cheapest result
pub fn calculate_best_pricing(
    plans: &[PricePlan],
    cart: &[CartLine],
    as_of: NaiveDate,
) -> Result<CartQuote, PricingError> {
    BestPlanStrategy::new(plans).quote(cart, as_of)
}

/// Price a cart under each of the named `plans` and return the cheapest result
pub fn compare_selected_plans(
    plans: &[PricePlan],
    cart: &[CartLine],
    as_of: NaiveDate,
) -> Result<CartQuote, PricingError> {
    BestPlanStrategy::selected(plans).quote(cart, as_of)
}
