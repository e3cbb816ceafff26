//! Pricing service: validates carts, loads pricing data and runs the pricing strategies

use chrono::{NaiveDate, Utc};
use shared::{
    calculate_best_pricing, cart_lines_from_items, compare_selected_plans, price_cart,
    BestPlanRequest, CalculatePriceRequest, CartLine, CartQuote, DiscountPlanSummary, PricePlan,
    StrategyKind,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::RuleStore;
use crate::error::{AppError, AppResult};

/// Pricing service for cart price calculation
#[derive(Clone)]
pub struct PricingService {
    store: RuleStore,
    default_strategy: StrategyKind,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Distinct product codes of a cart, in first-seen order
fn product_codes(cart: &[CartLine]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::with_capacity(cart.len());
    for line in cart {
        if !codes.contains(&line.product_code) {
            codes.push(line.product_code.clone());
        }
    }
    codes
}

/// Compare loaded plans for a cart.
///
/// Named plans are compared as loaded, whatever their dates or active flag,
/// and every named id must have been found. Without names, only plans in
/// effect on `as_of` take part.
fn compare_plans(
    plans: &[PricePlan],
    plan_ids: Option<&[Uuid]>,
    cart: &[CartLine],
    as_of: NaiveDate,
) -> AppResult<CartQuote> {
    let Some(ids) = plan_ids else {
        return Ok(calculate_best_pricing(plans, cart, as_of)?);
    };

    if let Some(missing) = ids.iter().find(|id| !plans.iter().any(|plan| plan.id == **id)) {
        return Err(AppError::NotFound(format!("Price plan {}", missing)));
    }
    Ok(compare_selected_plans(plans, cart, as_of)?)
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(db: PgPool, default_strategy: StrategyKind) -> Self {
        Self {
            store: RuleStore::new(db),
            default_strategy,
        }
    }

    /// Price a cart with the requested strategy, or the configured default
    pub async fn calculate_price(&self, request: CalculatePriceRequest) -> AppResult<CartQuote> {
        request.validate()?;
        let cart = cart_lines_from_items(&request.cart_items)?;
        let as_of = request.as_of.unwrap_or_else(today);
        let strategy = request.strategy.unwrap_or(self.default_strategy);

        match strategy {
            StrategyKind::TieredRate => self.price_tiered(&cart, as_of).await,
            StrategyKind::BestPlan => self.price_best_plan(&cart, None, as_of).await,
        }
    }

    /// Compare price plans for a cart and return the cheapest
    pub async fn calculate_best_pricing(&self, request: BestPlanRequest) -> AppResult<CartQuote> {
        request.validate()?;
        let cart = cart_lines_from_items(&request.cart_items)?;
        let as_of = request.as_of.unwrap_or_else(today);

        self.price_best_plan(&cart, request.plan_ids.as_deref(), as_of)
            .await
    }

    /// Discount plans active on `as_of` with their tier rules
    pub async fn list_plans(&self, as_of: Option<NaiveDate>) -> AppResult<Vec<DiscountPlanSummary>> {
        self.store.list_active_plans(as_of.unwrap_or_else(today)).await
    }

    async fn price_tiered(&self, cart: &[CartLine], as_of: NaiveDate) -> AppResult<CartQuote> {
        if cart.is_empty() {
            return Ok(CartQuote::empty());
        }

        let catalog = self.store.load_catalog(&product_codes(cart), as_of).await?;
        let quote = price_cart(&catalog, cart, as_of)?;

        tracing::info!(
            strategy = %StrategyKind::TieredRate,
            lines = cart.len(),
            subtotal = %quote.subtotal,
            discount = %quote.discount,
            plan_id = ?quote.applied_plan.as_ref().map(|plan| plan.plan_id),
            "Cart priced"
        );

        Ok(quote)
    }

    async fn price_best_plan(
        &self,
        cart: &[CartLine],
        plan_ids: Option<&[Uuid]>,
        as_of: NaiveDate,
    ) -> AppResult<CartQuote> {
        if cart.is_empty() {
            return Ok(CartQuote::empty());
        }

        let plans = self.store.load_price_plans(plan_ids, as_of).await?;
        let quote = compare_plans(&plans, plan_ids, cart, as_of)?;

        tracing::info!(
            strategy = %StrategyKind::BestPlan,
            lines = cart.len(),
            candidates = quote.evaluated_plans.len(),
            final_amount = %quote.final_amount,
            plan_id = ?quote.applied_plan.as_ref().map(|plan| plan.plan_id),
            "Cart priced"
        );

        Ok(quote)
    }
}
