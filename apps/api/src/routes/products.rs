//! `/api/products` handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use bizvoice_core::{NewProduct, PriceHistory, Product, ProductSummary, ProductUpdate};

use super::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::error::ApiError;
use crate::services::ProductService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    ApiJson(product): ApiJson<NewProduct>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(ProductService::new(state).create(product).await?))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(ProductService::new(state).list().await?))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<ProductSummary>>, ApiError> {
    Ok(Json(ProductService::new(state).search(&params.q).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(ProductService::new(state).update(&id, changes, &user).await?))
}

pub async fn price_history(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<PriceHistory>>, ApiError> {
    Ok(Json(ProductService::new(state).price_history(&id).await?))
}
