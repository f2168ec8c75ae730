//! `/api/auth` and `/api/profile` handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use bizvoice_core::{BusinessProfile, NewUser, User};

use super::extract::{AdminUser, ApiJson, CurrentUser};
use crate::error::ApiError;
use crate::services::{AuthService, LoginResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: User,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = AuthService::new(state)
        .login(request.username.trim(), &request.password)
        .await?;
    Ok(Json(response))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AdminUser(acting): AdminUser,
    ApiJson(new_user): ApiJson<NewUser>,
) -> Result<Json<CreateUserResponse>, ApiError> {
    let user = AuthService::new(state).create_user(new_user, &acting).await?;
    Ok(Json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user,
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub async fn get_business_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<BusinessProfile> {
    Json(AuthService::new(state).business_profile(&user))
}

pub async fn update_business_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(profile): ApiJson<BusinessProfile>,
) -> Result<Json<BusinessProfile>, ApiError> {
    let profile = AuthService::new(state)
        .update_business_profile(&user, profile)
        .await?;
    Ok(Json(profile))
}
