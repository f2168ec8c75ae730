//! Shared application state.

use bizvoice_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Everything a request handler needs, built once at startup and shared
/// behind an `Arc`.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        AppState { db, config, jwt }
    }
}
