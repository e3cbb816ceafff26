//! WebAssembly module for the distribution pricing dashboard
//!
//! Provides client-side computation for:
//! - Store base price display on product forms
//! - Cart price preview with quantity tiers
//! - Price plan comparison before an order is submitted

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::{
    calculate_best_pricing, cart_lines_from_items, compare_selected_plans, price_cart, CartQuote,
    RuleCatalog, StrategyKind,
};

/// Plans and rules sent by the dashboard for offline preview
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogInput {
    #[serde(default)]
    plans: Vec<DiscountPlan>,
    #[serde(default)]
    rules: Vec<PricingRule>,
}

/// Today in the browser's local time zone
fn browser_today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or(NaiveDate::MIN)
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn quote_to_json(quote: &CartQuote) -> Result<String, String> {
    serde_json::to_string(quote).map_err(|e| format!("Failed to encode quote: {}", e))
}

fn preview_cart(request_json: &str, catalog_json: &str, today: NaiveDate) -> Result<String, String> {
    let request: CalculatePriceRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid cart JSON: {}", e))?;
    let catalog: CatalogInput = serde_json::from_str(catalog_json)
        .map_err(|e| format!("Invalid catalog JSON: {}", e))?;

    let cart = cart_lines_from_items(&request.cart_items).map_err(|e| e.to_string())?;
    let as_of = request.as_of.unwrap_or(today);
    let catalog = RuleCatalog::new(catalog.plans, catalog.rules);

    let quote = match request.strategy.unwrap_or_default() {
        StrategyKind::TieredRate => price_cart(&catalog, &cart, as_of),
        // Price plans are not part of the rule catalog; preview at base prices.
        StrategyKind::BestPlan => calculate_best_pricing(&[], &cart, as_of),
    }
    .map_err(|e| e.to_string())?;

    quote_to_json(&quote)
}

fn preview_plans(request_json: &str, plans_json: &str, today: NaiveDate) -> Result<String, String> {
    let request: BestPlanRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid cart JSON: {}", e))?;
    let mut plans: Vec<PricePlan> = serde_json::from_str(plans_json)
        .map_err(|e| format!("Invalid plans JSON: {}", e))?;

    let cart = cart_lines_from_items(&request.cart_items).map_err(|e| e.to_string())?;
    let as_of = request.as_of.unwrap_or(today);

    let quote = match &request.plan_ids {
        Some(ids) => {
            plans.retain(|plan| ids.contains(&plan.id));
            compare_selected_plans(&plans, &cart, as_of)
        }
        None => calculate_best_pricing(&plans, &cart, as_of),
    }
    .map_err(|e| e.to_string())?;

    quote_to_json(&quote)
}

/// Store base price (consumer price minus the 12.3% markdown) in whole rial
#[wasm_bindgen]
pub fn calculate_store_base_price(consumer_price: f64) -> f64 {
    let price = Decimal::from_f64(consumer_price).unwrap_or(Decimal::ZERO);
    shared::store_base_price(price).to_f64().unwrap_or(0.0)
}

/// Preview a cart quote from a `calculate-price` request and a plans/rules catalog
#[wasm_bindgen]
pub fn preview_cart_price(request_json: &str, catalog_json: &str) -> Result<String, JsValue> {
    preview_cart(request_json, catalog_json, browser_today()).map_err(to_js_error)
}

/// Preview the cheapest price plan for a cart
#[wasm_bindgen]
pub fn preview_best_plan(request_json: &str, plans_json: &str) -> Result<String, JsValue> {
    preview_plans(request_json, plans_json, browser_today()).map_err(to_js_error)
}

/// Check a discount rate entered on the plan form
#[wasm_bindgen]
pub fn is_valid_discount_rate(rate: f64) -> bool {
    Decimal::from_f64(rate).is_some_and(|rate| shared::validate_discount_rate(rate).is_ok())
}
