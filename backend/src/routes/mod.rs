//! Route definitions for the pricing server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Cart pricing
        .nest("/pricing", pricing_routes())
}

/// Pricing routes
fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/calculate-price", post(handlers::calculate_price))
        .route("/best-plan", post(handlers::calculate_best_plan))
        .route("/plans", get(handlers::list_discount_plans))
}
