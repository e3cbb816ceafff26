//! Service health: rule store reachability and the pricing defaults in effect

use axum::{extract::State, Json};
use serde::Serialize;
use shared::StrategyKind;
use sqlx::PgPool;

use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `healthy`, or `degraded` while the rule store is unreachable
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: DatabaseStatus,
    pub default_strategy: StrategyKind,
}

async fn database_status(db: &PgPool) -> DatabaseStatus {
    match sqlx::query("SELECT 1").execute(db).await {
        Ok(_) => DatabaseStatus::Connected,
        Err(err) => {
            tracing::warn!(error = %err, "Rule store unreachable during health check");
            DatabaseStatus::Disconnected
        }
    }
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = database_status(&state.db).await;
    let status = match database {
        DatabaseStatus::Connected => "healthy",
        DatabaseStatus::Disconnected => "degraded",
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
        default_strategy: state.config.pricing.default_strategy,
    })
}
