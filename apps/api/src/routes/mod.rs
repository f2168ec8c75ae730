//! HTTP routing.
//!
//! ```text
//! /api
//!  ├── /health                         GET    (no token)
//!  ├── /auth/login                     POST   (no token)
//!  ├── /auth/create-user               POST   admin
//!  ├── /auth/me                        GET
//!  ├── /profile/business               GET PUT
//!  ├── /products                       GET POST
//!  ├── /products/search?q=             GET
//!  ├── /products/{id}                  PUT
//!  ├── /products/{id}/price-history    GET
//!  ├── /invoices                       GET POST
//!  ├── /invoices/{id}                  GET
//!  ├── /invoices/{id}/status?status=   PUT
//!  ├── /invoices/{id}/pdf              GET
//!  └── /dashboard/stats                GET
//! ```

mod auth;
mod dashboard;
mod extract;
mod invoices;
mod products;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use extract::{ApiJson, ApiQuery, CurrentUser};

use crate::config::ApiConfig;
use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let api = Router::new()
        .route("/health", get(dashboard::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/create-user", post(auth::create_user))
        .route("/auth/me", get(auth::me))
        .route(
            "/profile/business",
            get(auth::get_business_profile).put(auth::update_business_profile),
        )
        .route("/products", get(products::list).post(products::create))
        .route("/products/search", get(products::search))
        .route("/products/{id}", put(products::update))
        .route("/products/{id}/price-history", get(products::price_history))
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route("/invoices/{id}", get(invoices::get))
        .route("/invoices/{id}/status", put(invoices::set_status))
        .route("/invoices/{id}/pdf", get(invoices::pdf))
        .route("/dashboard/stats", get(dashboard::stats));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
