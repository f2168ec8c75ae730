//! `/api/dashboard` and `/api/health` handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use bizvoice_core::DashboardStats;

use super::extract::CurrentUser;
use crate::error::ApiError;
use crate::services::DashboardService;
use crate::state::AppState;

pub async fn stats(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(DashboardService::new(state).stats().await?))
}

/// Unauthenticated liveness check including the store.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = state.db.health_check().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "healthy" } else { "degraded" },
            "database": database,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
