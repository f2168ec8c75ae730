//! API server configuration.
//!
//! Layered with the `config` crate, later sources overriding earlier ones:
//!
//! ```text
//! built-in defaults ──► bizvoice.toml (optional) ──► BIZVOICE_* environment
//! ```
//!
//! `BIZVOICE_CORS_ORIGINS` takes a comma separated list.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Development signing key. Tokens signed with it are worthless in production.
pub const DEV_JWT_SECRET: &str = "bizvoice-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Allowed browser origins, `*` for any
    pub cors_origins: Vec<String>,

    /// Account created at startup when no active admin exists
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_full_name: String,

    /// Reject invoice lines whose amount differs from quantity × rate
    pub strict_line_amounts: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8001,
            database_path: "bizvoice.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 86_400, // 24 hours
            cors_origins: vec!["*".to_string()],
            admin_username: "admin".to_string(),
            admin_email: "admin@bizvoice.local".to_string(),
            admin_password: "admin123".to_string(),
            admin_full_name: "Administrator".to_string(),
            strict_line_amounts: false,
        }
    }
}

impl ApiConfig {
    /// Loads defaults, then `bizvoice.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config: ApiConfig = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path)?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_lifetime_secs", defaults.jwt_lifetime_secs)?
            .set_default("cors_origins", defaults.cors_origins)?
            .set_default("admin_username", defaults.admin_username)?
            .set_default("admin_email", defaults.admin_email)?
            .set_default("admin_password", defaults.admin_password)?
            .set_default("admin_full_name", defaults.admin_full_name)?
            .set_default("strict_line_amounts", defaults.strict_line_amounts)?
            .add_source(File::with_name("bizvoice").required(false))
            .add_source(
                Environment::with_prefix("BIZVOICE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("jwt_lifetime_secs".to_string()));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }

        if self.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the development JWT secret; set BIZVOICE_JWT_SECRET in production");
        }
        Ok(())
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o.trim() == "*")
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:8001");
        assert_eq!(config.jwt_lifetime_secs, 86_400);
        assert!(config.allows_any_origin());
        assert!(!config.strict_line_amounts);
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let config = ApiConfig {
            jwt_lifetime_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_blank_secret() {
        let config = ApiConfig {
            jwt_secret: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_explicit_origins() {
        let config = ApiConfig {
            cors_origins: vec!["https://app.example.com".to_string()],
            ..Default::default()
        };
        assert!(!config.allows_any_origin());
    }
}
