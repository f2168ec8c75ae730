//! # Report Repository
//!
//! Dashboard aggregates, computed fresh on every call.
//!
//! ## Top Products
//! Line items live inside the `items` JSON column, so the ranking unwinds
//! them with `json_each` and groups by the frozen product name:
//!
//! ```text
//! invoices.items ──json_each──► one row per line ──GROUP BY name──►
//!     Σ quantity, Σ amount_cents ──ORDER BY amount DESC──► LIMIT 5
//! ```

use chrono::{DateTime, Datelike, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bizvoice_core::{DashboardStats, TopProduct, TOP_PRODUCTS_LIMIT};

/// First instant of `now`'s calendar month, in UTC.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the dashboard numbers as of `now`.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let since = month_start(now);

        let (total_invoices, total_revenue_cents): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), CAST(COALESCE(SUM(total_cents), 0) AS INTEGER) FROM invoices",
        )
        .fetch_one(&self.pool)
        .await?;

        let monthly_revenue_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT CAST(COALESCE(SUM(total_cents), 0) AS INTEGER)
            FROM invoices
            WHERE created_at >= ?1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let top_products = self.top_products(TOP_PRODUCTS_LIMIT).await?;

        debug!(
            total_invoices,
            total_revenue_cents,
            monthly_revenue_cents,
            month_start = %since,
            "Computed dashboard stats"
        );

        Ok(DashboardStats {
            total_invoices,
            total_revenue_cents,
            monthly_revenue_cents,
            top_products,
        })
    }

    /// Products ranked by billed amount across every invoice line.
    pub async fn top_products(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        let rows: Vec<(String, f64, i64)> = sqlx::query_as(
            r#"
            SELECT
                json_extract(item.value, '$.product_name') AS name,
                CAST(SUM(json_extract(item.value, '$.quantity')) AS REAL) AS quantity,
                CAST(SUM(json_extract(item.value, '$.amount_cents')) AS INTEGER) AS amount
            FROM invoices, json_each(invoices.items) AS item
            GROUP BY name
            ORDER BY amount DESC, name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, quantity, amount_cents)| TopProduct {
                name,
                quantity,
                amount_cents,
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
