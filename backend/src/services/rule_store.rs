//! Read-only PostgreSQL access to discount plans, tier rules and price plans

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{
    normalize_product_code, validate_price_plan, validate_pricing_rule, ActiveWindow, DiscountPlan, DiscountPlanSummary,
    PlanItemPrice, PlanTier, PricePlan, PricingRule, RuleCatalog, TierDiscount,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Persian then Arabic-Indic digits, matched position by position with `ASCII_DIGITS`
const LOCAL_DIGITS: &str = "۰۱۲۳۴۵۶۷۸۹٠١٢٣٤٥٦٧٨٩";
const ASCII_DIGITS: &str = "01234567890123456789";

/// Loads pricing data for a single calculation
#[derive(Clone)]
pub struct RuleStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct DiscountPlanRow {
    id: Uuid,
    name: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_active: bool,
}

impl From<DiscountPlanRow> for DiscountPlan {
    fn from(row: DiscountPlanRow) -> Self {
        DiscountPlan {
            id: row.id,
            name: row.name,
            window: ActiveWindow::new(row.start_date, row.end_date),
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, FromRow)]
struct PricingRuleRow {
    id: Uuid,
    plan_id: Uuid,
    product_code: String,
    min_quantity: i32,
    discount_rate: Decimal,
    description: Option<String>,
}

impl From<PricingRuleRow> for PricingRule {
    fn from(row: PricingRuleRow) -> Self {
        PricingRule {
            id: row.id,
            plan_id: row.plan_id,
            product_code: normalize_product_code(&row.product_code),
            min_quantity: row.min_quantity,
            discount_rate: row.discount_rate,
            description: row.description,
        }
    }
}

#[derive(Debug, FromRow)]
struct PricePlanRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct PlanItemRow {
    plan_id: Uuid,
    product_code: String,
    unit_price: Decimal,
    max_quantity: Option<i32>,
}

impl From<PlanItemRow> for PlanItemPrice {
    fn from(row: PlanItemRow) -> Self {
        PlanItemPrice {
            product_code: normalize_product_code(&row.product_code),
            unit_price: row.unit_price,
            max_quantity: row.max_quantity,
        }
    }
}

#[derive(Debug, FromRow)]
struct PlanTierRow {
    plan_id: Uuid,
    min_total_quantity: i32,
    discount_kind: String,
    discount_value: Decimal,
}

impl PlanTierRow {
    fn into_tier(self) -> Option<PlanTier> {
        let discount = match self.discount_kind.as_str() {
            "amount" => TierDiscount::Amount(self.discount_value),
            "rate" => TierDiscount::Rate(self.discount_value),
            other => {
                tracing::warn!(plan_id = %self.plan_id, kind = other, "Skipping tier with unknown discount kind");
                return None;
            }
        };
        Some(PlanTier {
            min_total_quantity: self.min_total_quantity,
            discount,
        })
    }
}

/// Keep rules that pass validation, logging the rest
fn valid_rules(rules: Vec<PricingRule>) -> Vec<PricingRule> {
    rules
        .into_iter()
        .filter(|rule| match validate_pricing_rule(rule) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(rule_id = %rule.id, reason, "Skipping invalid pricing rule");
                false
            }
        })
        .collect()
}

impl RuleStore {
    /// Create a new RuleStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Load the rules of plans active on `as_of` for the given products
    pub async fn load_catalog(
        &self,
        product_codes: &[String],
        as_of: NaiveDate,
    ) -> AppResult<RuleCatalog> {
        let rules: Vec<PricingRule> = sqlx::query_as::<_, PricingRuleRow>(
            r#"
            SELECT r.id, r.plan_id, r.product_code, r.min_quantity, r.discount_rate, r.description
            FROM pricing_rules r
            JOIN discount_plans p ON p.id = r.plan_id
            WHERE btrim(translate(r.product_code, $3, $4)) = ANY($1)
              AND p.is_active = true
              AND p.start_date <= $2
              AND (p.end_date IS NULL OR p.end_date >= $2)
            ORDER BY r.product_code, r.min_quantity DESC
            "#,
        )
        .bind(product_codes)
        .bind(as_of)
        .bind(LOCAL_DIGITS)
        .bind(ASCII_DIGITS)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(PricingRule::from)
        .collect();

        let mut plan_ids: Vec<Uuid> = rules.iter().map(|rule| rule.plan_id).collect();
        plan_ids.sort_unstable();
        plan_ids.dedup();

        let plans = sqlx::query_as::<_, DiscountPlanRow>(
            r#"
            SELECT id, name, start_date, end_date, is_active
            FROM discount_plans
            WHERE id = ANY($1)
            "#,
        )
        .bind(&plan_ids)
        .fetch_all(&self.db)
        .await?;

        let catalog = RuleCatalog::new(plans.into_iter().map(DiscountPlan::from), valid_rules(rules));
        tracing::debug!(
            products = product_codes.len(),
            plans = catalog.plan_count(),
            rules = catalog.rule_count(),
            "Loaded rule catalog"
        );

        Ok(catalog)
    }

    /// List discount plans active on `as_of` together with their rules
    pub async fn list_active_plans(&self, as_of: NaiveDate) -> AppResult<Vec<DiscountPlanSummary>> {
        let plans = sqlx::query_as::<_, DiscountPlanRow>(
            r#"
            SELECT id, name, start_date, end_date, is_active
            FROM discount_plans
            WHERE is_active = true
              AND start_date <= $1
              AND (end_date IS NULL OR end_date >= $1)
            ORDER BY start_date DESC, name
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.db)
        .await?;

        let plan_ids: Vec<Uuid> = plans.iter().map(|plan| plan.id).collect();
        let rules = sqlx::query_as::<_, PricingRuleRow>(
            r#"
            SELECT id, plan_id, product_code, min_quantity, discount_rate, description
            FROM pricing_rules
            WHERE plan_id = ANY($1)
            ORDER BY product_code, min_quantity DESC
            "#,
        )
        .bind(&plan_ids)
        .fetch_all(&self.db)
        .await?;

        let mut rules_by_plan: HashMap<Uuid, Vec<PricingRule>> = HashMap::new();
        for rule in rules.into_iter().map(PricingRule::from) {
            rules_by_plan.entry(rule.plan_id).or_default().push(rule);
        }

        Ok(plans
            .into_iter()
            .map(|row| {
                let rules = rules_by_plan.remove(&row.id).unwrap_or_default();
                DiscountPlanSummary {
                    plan: DiscountPlan::from(row),
                    rules,
                }
            })
            .collect())
    }

    /// Load price plans for the best-plan comparison.
    ///
    /// With `plan_ids` the named plans are loaded whatever their state, so the
    /// caller can tell unknown ids apart from inactive plans. Without, only
    /// plans active on `as_of` are loaded.
    pub async fn load_price_plans(
        &self,
        plan_ids: Option<&[Uuid]>,
        as_of: NaiveDate,
    ) -> AppResult<Vec<PricePlan>> {
        let rows = match plan_ids {
            Some(ids) => {
                sqlx::query_as::<_, PricePlanRow>(
                    r#"
                    SELECT id, name, description, start_date, end_date, is_active
                    FROM price_plans
                    WHERE id = ANY($1)
                    ORDER BY created_at, id
                    "#,
                )
                .bind(ids)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, PricePlanRow>(
                    r#"
                    SELECT id, name, description, start_date, end_date, is_active
                    FROM price_plans
                    WHERE is_active = true
                      AND start_date <= $1
                      AND (end_date IS NULL OR end_date >= $1)
                    ORDER BY created_at, id
                    "#,
                )
                .bind(as_of)
                .fetch_all(&self.db)
                .await?
            }
        };

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let items = sqlx::query_as::<_, PlanItemRow>(
            r#"
            SELECT plan_id, product_code, unit_price, max_quantity
            FROM price_plan_items
            WHERE plan_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let tiers = sqlx::query_as::<_, PlanTierRow>(
            r#"
            SELECT plan_id, min_total_quantity, discount_kind, discount_value
            FROM price_plan_tiers
            WHERE plan_id = ANY($1)
            ORDER BY min_total_quantity
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut items_by_plan: HashMap<Uuid, Vec<PlanItemPrice>> = HashMap::new();
        for item in items {
            items_by_plan
                .entry(item.plan_id)
                .or_default()
                .push(PlanItemPrice::from(item));
        }

        let mut tiers_by_plan: HashMap<Uuid, Vec<PlanTier>> = HashMap::new();
        for row in tiers {
            let plan_id = row.plan_id;
            if let Some(tier) = row.into_tier() {
                tiers_by_plan.entry(plan_id).or_default().push(tier);
            }
        }

        let plans = rows
            .into_iter()
            .map(|row| PricePlan {
                id: row.id,
                name: row.name,
                description: row.description,
                is_active: row.is_active,
                window: ActiveWindow::new(row.start_date, row.end_date),
                items: items_by_plan.remove(&row.id).unwrap_or_default(),
                tiers: tiers_by_plan.remove(&row.id).unwrap_or_default(),
            })
            .filter(|plan| match validate_price_plan(plan) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::warn!(plan_id = %plan.id, reason, "Skipping invalid price plan");
                    false
                }
            })
            .collect();

        Ok(plans)
    }
}
