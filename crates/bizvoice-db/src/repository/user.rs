//! # User Repository
//!
//! Accounts, password hashes and business profiles.
//!
//! The password hash is only ever returned through [`StoredUser`], which the
//! auth gate uses to verify a login. Everything else gets a plain
//! [`User`](bizvoice_core::User) that has no hash field at all.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bizvoice_core::{BusinessProfile, User, UserRole};

/// Row shape of the `users` table.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    role: UserRole,
    is_active: bool,
    business_profile: Option<Json<BusinessProfile>>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_stored(self) -> StoredUser {
        StoredUser {
            password_hash: self.password_hash,
            user: User {
                id: self.id,
                username: self.username,
                email: self.email,
                full_name: self.full_name,
                role: self.role,
                is_active: self.is_active,
                business_profile: self.business_profile.map(|Json(p)| p),
                created_at: self.created_at,
            },
        }
    }
}

/// A user together with their password hash.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    /// PHC-format argon2 hash.
    pub password_hash: String,
}

const SELECT_USER: &str = r#"
    SELECT id, username, email, full_name, password_hash, role, is_active,
           business_profile, created_at
    FROM users
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Looks up a user and their hash by login name.
    pub async fn find_credentials(&self, username: &str) -> DbResult<Option<StoredUser>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE username = ?1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRow::into_stored))
    }

    /// Gets a user by login name.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        Ok(self.find_credentials(username).await?.map(|s| s.user))
    }

    /// Whether either the username or the email is already taken.
    pub async fn exists(&self, username: &str, email: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2")
                .bind(username)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - username or email already exists
    pub async fn insert(&self, user: &User, password_hash: &str) -> DbResult<()> {
        debug!(username = %user.username, role = %user.role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, full_name, password_hash,
                role, is_active, business_profile, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(password_hash)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.business_profile.as_ref().map(Json))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_value(&user.username))?;

        Ok(())
    }

    /// Replaces a user's business profile and returns the updated user.
    ///
    /// Invoices hold their own copy, so this never changes issued documents.
    pub async fn update_business_profile(
        &self,
        username: &str,
        profile: &BusinessProfile,
    ) -> DbResult<User> {
        debug!(username = %username, company = %profile.company_name, "Updating business profile");

        let result = sqlx::query("UPDATE users SET business_profile = ?2 WHERE username = ?1")
            .bind(username)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
        }

        self.get_by_username(username)
            .await?
            .ok_or_else(|| DbError::not_found("User", username))
    }

    /// Activates or deactivates an account.
    ///
    /// A deactivated account can neither log in nor use tokens issued
    /// before the change.
    pub async fn set_active(&self, username: &str, active: bool) -> DbResult<()> {
        debug!(username = %username, active, "Changing account state");

        let result = sqlx::query("UPDATE users SET is_active = ?2 WHERE username = ?1")
            .bind(username)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
        }

        Ok(())
    }

    /// Counts active admin accounts (startup bootstrap check).
    pub async fn count_admins(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin' AND is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use uuid::Uuid;

    fn user(username: &str, email: &str, role: UserRole) -> User {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: username.to_uppercase(),
            role,
            is_active: true,
            business_profile: Some(BusinessProfile::default()),
            created_at: Utc::now(),
        }
    }

    async fn repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_insert_and_find_credentials() {
        let repo = repo().await;
        let alice = user("alice", "alice@example.com", UserRole::User);
        repo.insert(&alice, "$argon2id$fake").await.unwrap();

        let stored = repo.find_credentials("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$fake");
        assert_eq!(stored.user, alice);

        assert!(repo.find_credentials("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let repo = repo().await;
        repo.insert(&user("alice", "a1@example.com", UserRole::User), "h")
            .await
            .unwrap();

        let err = repo
            .insert(&user("alice", "a2@example.com", UserRole::User), "h")
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "users.username");
                assert_eq!(value, "alice");
            }
            other => panic!("expected unique violation, got {:?}", other),
        }

        assert!(repo.exists("someone", "a1@example.com").await.unwrap());
        assert!(!repo.exists("someone", "new@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_business_profile() {
        let repo = repo().await;
        repo.insert(&user("alice", "alice@example.com", UserRole::User), "h")
            .await
            .unwrap();

        let profile = BusinessProfile {
            company_name: "Alice Exports".to_string(),
            gst_number: Some("27ABCDE1234F1Z5".to_string()),
            ..Default::default()
        };
        let updated = repo
            .update_business_profile("alice", &profile)
            .await
            .unwrap();
        assert_eq!(updated.business_profile, Some(profile));

        let missing = repo
            .update_business_profile("nobody", &BusinessProfile::default())
            .await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_admin_count_ignores_inactive() {
        let repo = repo().await;
        assert_eq!(repo.count_admins().await.unwrap(), 0);

        repo.insert(&user("root", "root@example.com", UserRole::Admin), "h")
            .await
            .unwrap();
        assert_eq!(repo.count_admins().await.unwrap(), 1);

        repo.set_active("root", false).await.unwrap();
        assert_eq!(repo.count_admins().await.unwrap(), 0);
        let root = repo.get_by_username("root").await.unwrap().unwrap();
        assert!(!root.is_active);
    }
}
