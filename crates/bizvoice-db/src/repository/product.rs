//! # Product Repository
//!
//! Database operations for the catalog and its price history.
//!
//! ## Price Change Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    update(id, changes, "alice")                         │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    SELECT product ──── missing? ──► ROLLBACK, NotFound                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    apply changes (name, description, unit, price)                      │
//! │       │                                                                 │
//! │    UPDATE products                                                     │
//! │       │                                                                 │
//! │       ├── price present AND different?                                 │
//! │       │      └── INSERT price_history {old, new, "alice"}              │
//! │       ▼                                                                 │
//! │  COMMIT  (product and history land together or not at all)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bizvoice_core::{PriceHistory, Product, ProductUpdate};

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, description, current_price_cents, unit, created_at, updated_at
    FROM products
"#;

/// Escapes LIKE wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Case-insensitive substring search on product name.
    ///
    /// ## Arguments
    /// * `query` - Search term (already trimmed); empty matches everything
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: i64) -> DbResult<Vec<Product>> {
        debug!(query = %query, limit = %limit, "Searching products");

        let products: Vec<Product> = sqlx::query_as(&format!(
            "{SELECT_PRODUCT} WHERE LOWER(name) LIKE LOWER(?1) ESCAPE '\\' ORDER BY name LIMIT ?2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products, newest first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<Product>> {
        let products: Vec<Product> = sqlx::query_as(&format!(
            "{SELECT_PRODUCT} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product: Option<Product> =
            sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(product)
    }

    /// Inserts a new product (id and timestamps assigned by the caller).
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, current_price_cents, unit, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.current_price_cents)
        .bind(&product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Applies a partial update and records a price change, atomically.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as stored after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(
        &self,
        id: &str,
        changes: &ProductUpdate,
        changed_by: &str,
    ) -> DbResult<Product> {
        debug!(id = %id, changed_by = %changed_by, "Updating product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let mut product: Product = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let old_price = changes.apply(&mut product, now);

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                current_price_cents = ?4,
                unit = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.current_price_cents)
        .bind(&product.unit)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(old_price_cents) = old_price {
            debug!(
                id = %id,
                old = old_price_cents,
                new = product.current_price_cents,
                "Recording price change"
            );

            sqlx::query(
                r#"
                INSERT INTO price_history (
                    id, product_id, old_price_cents, new_price_cents, changed_by, changed_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&product.id)
            .bind(old_price_cents)
            .bind(product.current_price_cents)
            .bind(changed_by)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Price changes of one product, newest first.
    pub async fn price_history(&self, product_id: &str) -> DbResult<Vec<PriceHistory>> {
        let history: Vec<PriceHistory> = sqlx::query_as(
            r#"
            SELECT id, product_id, old_price_cents, new_price_cents, changed_by, changed_at
            FROM price_history
            WHERE product_id = ?1
            ORDER BY changed_at DESC, rowid DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    /// Counts total products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
