//! # Invoice Repository
//!
//! Database operations for invoices.
//!
//! ## Invoice Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create(|number| Invoice::assemble(..))                 │
//! │                                                                         │
//! │  Request A                          Request B                          │
//! │     │                                  │                                │
//! │  BEGIN                                 │                                │
//! │  UPDATE counters ... RETURNING 1       │                                │
//! │     │  (holds the write lock)       BEGIN                              │
//! │  INSERT INV-0001                    UPDATE counters ... (waits)        │
//! │  COMMIT ─────────────────────────►     │                                │
//! │                                     RETURNING 2                        │
//! │                                     INSERT INV-0002                    │
//! │                                     COMMIT                             │
//! │                                                                         │
//! │  A crash between UPDATE and COMMIT rolls both back: no gaps, no dups.  │
//! │  The UNIQUE index on invoice_number is the last line of defence.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bizvoice_core::{
    format_invoice_number, BankDetails, BusinessProfile, Customer, Invoice, InvoiceItem,
    InvoiceStatus,
};

const INVOICE_COUNTER: &str = "invoice";

const SELECT_INVOICE: &str = r#"
    SELECT id, invoice_number, customer, items, subtotal_cents, tax_rate_bps, tax_cents,
           total_cents, bank_details, notes, status, created_by, business_profile,
           invoice_date, due_date, created_at, updated_at
    FROM invoices
"#;

/// Row shape of the `invoices` table.
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    invoice_number: String,
    customer: Json<Customer>,
    items: Json<Vec<InvoiceItem>>,
    subtotal_cents: i64,
    tax_rate_bps: u32,
    tax_cents: i64,
    total_cents: i64,
    bank_details: Option<Json<BankDetails>>,
    notes: Option<String>,
    status: InvoiceStatus,
    created_by: String,
    business_profile: Option<Json<BusinessProfile>>,
    invoice_date: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Invoice {
            id: row.id,
            invoice_number: row.invoice_number,
            customer: row.customer.0,
            items: row.items.0,
            subtotal_cents: row.subtotal_cents,
            tax_rate_bps: row.tax_rate_bps,
            tax_cents: row.tax_cents,
            total_cents: row.total_cents,
            bank_details: row.bank_details.map(|Json(b)| b),
            notes: row.notes,
            status: row.status,
            created_by: row.created_by,
            business_profile: row.business_profile.map(|Json(p)| p),
            invoice_date: row.invoice_date,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Allocates the next invoice number and stores the invoice built for it.
    ///
    /// `build` receives the formatted number ("INV-0001") and must return
    /// the complete invoice. Allocation and insert share one transaction.
    pub async fn create<F>(&self, build: F) -> DbResult<Invoice>
    where
        F: FnOnce(String) -> Invoice + Send,
    {
        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(
            "UPDATE counters SET value = value + 1 WHERE name = ?1 RETURNING value",
        )
        .bind(INVOICE_COUNTER)
        .fetch_one(&mut *tx)
        .await?;

        let invoice = build(format_invoice_number(sequence));

        debug!(
            id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total_cents = invoice.total_cents,
            "Inserting invoice"
        );

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_number, customer, items,
                subtotal_cents, tax_rate_bps, tax_cents, total_cents,
                bank_details, notes, status, created_by, business_profile,
                invoice_date, due_date, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17
            )
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(Json(&invoice.customer))
        .bind(Json(&invoice.items))
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.tax_cents)
        .bind(invoice.total_cents)
        .bind(invoice.bank_details.as_ref().map(Json))
        .bind(&invoice.notes)
        .bind(invoice.status)
        .bind(&invoice.created_by)
        .bind(invoice.business_profile.as_ref().map(Json))
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_value(&invoice.invoice_number))?;

        tx.commit().await?;
        Ok(invoice)
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!("{SELECT_INVOICE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Invoice::from))
    }

    /// Lists invoices, newest first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(&format!(
            "{SELECT_INVOICE} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    /// Sets the status label and returns the updated invoice.
    ///
    /// Any status may follow any other.
    pub async fn set_status(&self, id: &str, status: InvoiceStatus) -> DbResult<Invoice> {
        debug!(id = %id, status = %status, "Updating invoice status");

        let result = sqlx::query("UPDATE invoices SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))
    }

    /// Counts stored invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
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
    use bizvoice_core::InvoiceDraft;

    fn draft(amounts: &[i64]) -> InvoiceDraft {
        InvoiceDraft {
            customer: Customer {
                name: "Acme Traders".to_string(),
                email: Some("accounts@acme.example".to_string()),
                phone: None,
                address: Some("12 MG Road".to_string()),
                city: Some("Pune".to_string()),
                state: Some("Maharashtra".to_string()),
                pincode: Some("411001".to_string()),
                gst_number: None,
            },
            items: amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| InvoiceItem {
                    product_id: format!("p-{}", i),
                    product_name: format!("Item {}", i + 1),
                    description: None,
                    quantity: 1.0,
                    rate_cents: *amount,
                    amount_cents: *amount,
                })
                .collect(),
            tax_rate_bps: 1800,
            bank_details: None,
            notes: Some("Net 30".to_string()),
            due_date: None,
        }
    }

    async fn repo() -> InvoiceRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().invoices()
    }

    async fn create(repo: &InvoiceRepository, amounts: &[i64]) -> Invoice {
        let d = draft(amounts);
        repo.create(move |number| {
            Invoice::assemble(
                d,
                number,
                "alice",
                Some(BusinessProfile::default()),
                Utc::now(),
            )
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_numbers_sequentially() {
        let repo = repo().await;

        let first = create(&repo, &[10000, 20000]).await;
        let second = create(&repo, &[500]).await;

        assert_eq!(first.invoice_number, "INV-0001");
        assert_eq!(second.invoice_number, "INV-0002");
        assert_eq!(first.subtotal_cents, 30000);
        assert_eq!(first.tax_cents, 5400);
        assert_eq!(first.total_cents, 35400);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_embedded_values() {
        let repo = repo().await;
        let created = create(&repo, &[10000]).await;

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_numbers() {
        // A file database, so the pool really hands out separate connections
        let path = std::env::temp_dir().join(format!("bizvoice-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();

        let tasks: Vec<_> = (1..=20)
            .map(|n| {
                let repo = db.invoices();
                tokio::spawn(async move { create(&repo, &[100 * n]).await.invoice_number })
            })
            .collect();

        let mut numbers = Vec::new();
        for task in tasks {
            numbers.push(task.await.unwrap());
        }
        numbers.sort();

        let expected: Vec<String> = (1..=20).map(format_invoice_number).collect();
        assert_eq!(numbers, expected);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }

    #[tokio::test]
    async fn test_set_status_any_transition() {
        let repo = repo().await;
        let invoice = create(&repo, &[100]).await;

        let paid = repo.set_status(&invoice.id, InvoiceStatus::Paid).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.updated_at >= invoice.updated_at);
        assert_eq!(paid.total_cents, invoice.total_cents);

        let back = repo.set_status(&invoice.id, InvoiceStatus::Draft).await.unwrap();
        assert_eq!(back.status, InvoiceStatus::Draft);

        let missing = repo.set_status("missing", InvoiceStatus::Sent).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = repo().await;
        create(&repo, &[100]).await;
        create(&repo, &[200]).await;

        let listed = repo.list(1000).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].invoice_number, "INV-0002");
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
