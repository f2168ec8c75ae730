//! `/api/invoices` handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use bizvoice_core::{Invoice, InvoiceDraft};

use super::extract::{ApiJson, ApiQuery, CurrentUser};
use crate::error::ApiError;
use crate::services::InvoiceService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(draft): ApiJson<InvoiceDraft>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(InvoiceService::new(state).create(draft, &user).await?))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    Ok(Json(InvoiceService::new(state).list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(InvoiceService::new(state).get(&id).await?))
}

pub async fn set_status(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<StatusParams>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(InvoiceService::new(state).set_status(&id, &params.status).await?))
}

pub async fn pdf(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let pdf = InvoiceService::new(state).render_pdf(&id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", pdf.filename),
            ),
        ],
        pdf.bytes,
    )
        .into_response())
}
