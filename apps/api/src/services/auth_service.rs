//! Authentication service.
//!
//! Login, token resolution, account creation and the caller's business
//! profile.
//!
//! ## Request Gate
//! ```text
//! Bearer token ──► JwtManager::validate ──► sub ──► users.get_by_username
//!                        │                              │
//!                  bad / expired                 missing / inactive
//!                        └──────────► UNAUTHORIZED ◄─────┘
//! ```
//!
//! The stored user is re-read on every request, so deactivating an account
//! or changing a role takes effect without waiting for tokens to expire.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use bizvoice_core::validation::{
    validate_company_name, validate_email, validate_full_name, validate_password,
    validate_username,
};
use bizvoice_core::{BusinessProfile, NewUser, User, UserRole};

use crate::auth::{hash_password, verify_password, verify_password_unknown_user};
use crate::error::ApiError;
use crate::state::AppState;

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}

/// Fails with `FORBIDDEN` unless the user is an admin.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

/// Authentication service implementation.
pub struct AuthService {
    state: Arc<AppState>,
}

impl AuthService {
    pub fn new(state: Arc<AppState>) -> Self {
        AuthService { state }
    }

    /// Exchange username and password for an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let stored = match self.state.db.users().find_credentials(username).await? {
            Some(stored) => stored,
            None => {
                // Same argon2 cost as a wrong password for a real account
                verify_password_unknown_user(password);
                warn!(username = %username, "Login for unknown user");
                return Err(ApiError::invalid_credentials());
            }
        };

        if !verify_password(password, &stored.password_hash) {
            warn!(username = %username, "Login with wrong password");
            return Err(ApiError::invalid_credentials());
        }

        if !stored.user.is_active {
            warn!(username = %username, "Login to inactive account");
            return Err(ApiError::account_inactive());
        }

        let access_token = self.state.jwt.issue(&stored.user.username, stored.user.role)?;

        info!(username = %stored.user.username, role = %stored.user.role, "Token issued");

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.state.jwt.lifetime_secs(),
            user: stored.user,
        })
    }

    /// Resolve a bearer token to its active user.
    pub async fn resolve_token(&self, token: &str) -> Result<User, ApiError> {
        let claims = self.state.jwt.validate(token)?;

        if claims.sub.trim().is_empty() {
            return Err(ApiError::unauthorized("Invalid token"));
        }

        let user = self
            .state
            .db
            .users()
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active {
            return Err(ApiError::unauthorized("Account is inactive"));
        }

        Ok(user)
    }

    /// Create an account. Admins only.
    pub async fn create_user(&self, new_user: NewUser, acting: &User) -> Result<User, ApiError> {
        require_admin(acting)?;

        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_string();
        let full_name = new_user.full_name.trim().to_string();

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&new_user.password)?;
        validate_full_name(&full_name)?;

        let users = self.state.db.users();
        if users.exists(&username, &email).await? {
            return Err(ApiError::conflict("Username or email already exists"));
        }

        let password_hash = hash_password(&new_user.password)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            full_name,
            role: new_user.role,
            is_active: true,
            business_profile: Some(BusinessProfile::default()),
            created_at: Utc::now(),
        };

        // A concurrent insert of the same name still lands here as CONFLICT
        users.insert(&user, &password_hash).await?;

        info!(
            username = %user.username,
            role = %user.role,
            created_by = %acting.username,
            "User created"
        );

        Ok(user)
    }

    /// The caller's stored profile, or defaults if never set.
    pub fn business_profile(&self, user: &User) -> BusinessProfile {
        user.profile_or_default()
    }

    /// Replace the caller's profile. Existing invoices keep their copy.
    pub async fn update_business_profile(
        &self,
        user: &User,
        profile: BusinessProfile,
    ) -> Result<BusinessProfile, ApiError> {
        let mut profile = profile;
        profile.company_name = profile.company_name.trim().to_string();
        validate_company_name(&profile.company_name)?;

        let updated = self
            .state
            .db
            .users()
            .update_business_profile(&user.username, &profile)
            .await?;

        info!(username = %user.username, company = %profile.company_name, "Business profile updated");
        Ok(updated.profile_or_default())
    }

    /// Create the configured admin account if no active admin exists.
    ///
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self) -> Result<bool, ApiError> {
        let users = self.state.db.users();
        if users.count_admins().await? > 0 {
            return Ok(false);
        }

        let config = &self.state.config;
        if users.exists(&config.admin_username, &config.admin_email).await? {
            warn!(
                username = %config.admin_username,
                "No active admin, but the configured admin name or email is taken"
            );
            return Ok(false);
        }

        let password_hash = hash_password(&config.admin_password)?;
        let admin = User {
            id: Uuid::new_v4().to_string(),
            username: config.admin_username.clone(),
            email: config.admin_email.clone(),
            full_name: config.admin_full_name.clone(),
            role: UserRole::Admin,
            is_active: true,
            business_profile: Some(BusinessProfile::default()),
            created_at: Utc::now(),
        };
        users.insert(&admin, &password_hash).await?;

        info!(username = %admin.username, "Created initial admin account");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::test_support;

    #[tokio::test]
    async fn test_admin_bootstrap_and_login() {
        let state = test_support::state().await;
        let auth = AuthService::new(state.clone());

        // Second call is a no-op
        assert!(!auth.ensure_admin().await.unwrap());

        let response = auth.login("admin", "admin123").await.unwrap();
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_in, 86_400);
        assert_eq!(response.user.role, UserRole::Admin);

        let resolved = auth.resolve_token(&response.access_token).await.unwrap();
        assert_eq!(resolved.username, "admin");
    }

    #[tokio::test]
    async fn test_bad_credentials_share_a_message() {
        let state = test_support::state().await;
        let auth = AuthService::new(state);

        let wrong_password = auth.login("admin", "nope").await.unwrap_err();
        let unknown_user = auth.login("ghost", "admin123").await.unwrap_err();

        assert_eq!(wrong_password.code, ErrorCode::InvalidCredentials);
        assert_eq!(unknown_user.code, ErrorCode::InvalidCredentials);
        assert_eq!(wrong_password.message, unknown_user.message);
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in_or_use_token() {
        let state = test_support::state().await;
        let auth = AuthService::new(state.clone());
        test_support::user(&state, "bob").await;

        let token = auth.login("bob", "password1").await.unwrap().access_token;
        state.db.users().set_active("bob", false).await.unwrap();

        let err = auth.login("bob", "password1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountInactive);

        let err = auth.resolve_token(&token).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_create_user_rules() {
        let state = test_support::state().await;
        let auth = AuthService::new(state.clone());
        let bob = test_support::user(&state, "bob").await;

        assert_eq!(bob.role, UserRole::User);
        assert!(bob.business_profile.is_some());

        let new_user = || NewUser {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "password1".to_string(),
            full_name: "Carol".to_string(),
            role: UserRole::User,
        };

        // Non-admins may not create accounts
        let err = auth.create_user(new_user(), &bob).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let admin = test_support::admin(&state).await;
        auth.create_user(new_user(), &admin).await.unwrap();

        let err = auth.create_user(new_user(), &admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let mut short = new_user();
        short.username = "dave".to_string();
        short.email = "dave@example.com".to_string();
        short.password = "123".to_string();
        let err = auth.create_user(short, &admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let state = test_support::state().await;
        let err = AuthService::new(state).resolve_token("garbage").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_update_business_profile() {
        let state = test_support::state().await;
        let auth = AuthService::new(state.clone());
        let admin = test_support::admin(&state).await;

        assert_eq!(auth.business_profile(&admin).company_name, "My Business");

        let profile = BusinessProfile {
            company_name: "  Sharma Traders ".to_string(),
            gst_number: Some("27ABCDE1234F1Z5".to_string()),
            ..Default::default()
        };
        let saved = auth.update_business_profile(&admin, profile).await.unwrap();
        assert_eq!(saved.company_name, "Sharma Traders");

        let blank = BusinessProfile {
            company_name: " ".to_string(),
            ..Default::default()
        };
        let err = auth.update_business_profile(&admin, blank).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
