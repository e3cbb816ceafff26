//! HTTP handlers for cart pricing endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{BestPlanRequest, CalculatePriceRequest, CartQuote, DiscountPlanSummary};

use crate::error::AppResult;
use crate::services::PricingService;
use crate::AppState;

fn pricing_service(state: &AppState) -> PricingService {
    PricingService::new(state.db.clone(), state.config.pricing.default_strategy)
}

/// Price a cart
pub async fn calculate_price(
    State(state): State<AppState>,
    Json(request): Json<CalculatePriceRequest>,
) -> AppResult<Json<CartQuote>> {
    let quote = pricing_service(&state).calculate_price(request).await?;
    Ok(Json(quote))
}

/// Price a cart under every candidate plan and return the cheapest
pub async fn calculate_best_plan(
    State(state): State<AppState>,
    Json(request): Json<BestPlanRequest>,
) -> AppResult<Json<CartQuote>> {
    let quote = pricing_service(&state).calculate_best_pricing(request).await?;
    Ok(Json(quote))
}

/// Query parameters for listing plans
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansQuery {
    pub as_of: Option<NaiveDate>,
}

/// List discount plans active on a date (today by default)
pub async fn list_discount_plans(
    State(state): State<AppState>,
    Query(query): Query<PlansQuery>,
) -> AppResult<Json<Vec<DiscountPlanSummary>>> {
    let plans = pricing_service(&state).list_plans(query.as_of).await?;
    Ok(Json(plans))
}
