//! Service implementations.
//!
//! Each service owns the business flow for one area and returns
//! `Result<_, ApiError>`; route handlers only extract input and serialize
//! output.

pub mod auth_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod product_service;

pub use auth_service::{require_admin, AuthService, LoginResponse};
pub use dashboard_service::DashboardService;
pub use invoice_service::InvoiceService;
pub use product_service::ProductService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use bizvoice_core::{NewUser, User, UserRole};
    use bizvoice_db::{Database, DbConfig};

    use super::AuthService;
    use crate::config::ApiConfig;
    use crate::state::AppState;

    pub async fn state() -> Arc<AppState> {
        state_with(ApiConfig::default()).await
    }

    pub async fn state_with(config: ApiConfig) -> Arc<AppState> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = Arc::new(AppState::new(db, config));
        AuthService::new(state.clone()).ensure_admin().await.unwrap();
        state
    }

    pub async fn admin(state: &Arc<AppState>) -> User {
        state
            .db
            .users()
            .get_by_username(&state.config.admin_username)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn user(state: &Arc<AppState>, username: &str) -> User {
        let admin = admin(state).await;
        AuthService::new(state.clone())
            .create_user(
                NewUser {
                    username: username.to_string(),
                    email: format!("{}@example.com", username),
                    password: "password1".to_string(),
                    full_name: username.to_string(),
                    role: UserRole::User,
                },
                &admin,
            )
            .await
            .unwrap()
    }
}
