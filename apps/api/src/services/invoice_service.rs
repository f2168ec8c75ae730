//! Invoice service.
//!
//! ## Create Flow
//! ```text
//! InvoiceDraft ──► validate_draft(strict?) ──► profile snapshot (by value)
//!                                                   │
//!        invoices().create(|number| Invoice::assemble(..)) ◄┘
//!              one transaction: counter + insert
//! ```

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use bizvoice_core::{validate_draft, Invoice, InvoiceDraft, InvoiceStatus, User, MAX_LIST_RESULTS};
use bizvoice_pdf::render_invoice;

use crate::error::ApiError;
use crate::state::AppState;

/// A rendered invoice ready to download.
#[derive(Debug, Clone)]
pub struct InvoicePdf {
    /// `<invoice_number>.pdf`
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Invoice operations behind `/api/invoices`.
pub struct InvoiceService {
    state: Arc<AppState>,
}

impl InvoiceService {
    pub fn new(state: Arc<AppState>) -> Self {
        InvoiceService { state }
    }

    /// Validates, numbers and stores a new invoice issued by `acting`.
    pub async fn create(&self, draft: InvoiceDraft, acting: &User) -> Result<Invoice, ApiError> {
        validate_draft(&draft, self.state.config.strict_line_amounts)?;

        let profile = acting.profile_or_default();
        let created_by = acting.username.clone();

        let invoice = self
            .state
            .db
            .invoices()
            .create(move |number| {
                Invoice::assemble(draft, number, &created_by, Some(profile), Utc::now())
            })
            .await?;

        info!(
            id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total_cents = invoice.total_cents,
            created_by = %invoice.created_by,
            "Invoice created"
        );

        Ok(invoice)
    }

    pub async fn get(&self, id: &str) -> Result<Invoice, ApiError> {
        self.state
            .db
            .invoices()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Invoice", id))
    }

    /// Newest first, capped.
    pub async fn list(&self) -> Result<Vec<Invoice>, ApiError> {
        Ok(self.state.db.invoices().list(MAX_LIST_RESULTS).await?)
    }

    /// Sets the status label. Any status may follow any other.
    pub async fn set_status(&self, id: &str, status: &str) -> Result<Invoice, ApiError> {
        let status = InvoiceStatus::from_str(status)?;
        let invoice = self.state.db.invoices().set_status(id, status).await?;

        info!(id = %id, status = %status, "Invoice status changed");
        Ok(invoice)
    }

    /// Fetches and renders an invoice.
    pub async fn render_pdf(&self, id: &str) -> Result<InvoicePdf, ApiError> {
        let invoice = self.get(id).await?;
        let bytes = render_invoice(&invoice)?;

        Ok(InvoicePdf {
            filename: format!("{}.pdf", invoice.invoice_number),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::error::ErrorCode;
    use crate::services::test_support;
    use bizvoice_core::{BusinessProfile, Customer, InvoiceItem};

    fn draft(lines: &[(f64, i64, i64)]) -> InvoiceDraft {
        InvoiceDraft {
            customer: Customer {
                name: "Acme Corp".to_string(),
                email: None,
                phone: None,
                address: None,
                city: None,
                state: None,
                pincode: None,
                gst_number: None,
            },
            items: lines
                .iter()
                .enumerate()
                .map(|(i, (quantity, rate, amount))| InvoiceItem {
                    product_id: format!("p{}", i),
                    product_name: format!("Item {}", i + 1),
                    description: None,
                    quantity: *quantity,
                    rate_cents: *rate,
                    amount_cents: *amount,
                })
                .collect(),
            tax_rate_bps: 1800,
            bank_details: None,
            notes: None,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_totals_and_snapshots_profile() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;
        let service = InvoiceService::new(state.clone());

        let invoice = service
            .create(draft(&[(1.0, 10000, 10000), (1.0, 20000, 20000)]), &admin)
            .await
            .unwrap();

        assert_eq!(invoice.invoice_number, "INV-0001");
        assert_eq!(invoice.subtotal_cents, 30000);
        assert_eq!(invoice.tax_cents, 5400);
        assert_eq!(invoice.total_cents, 35400);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.created_by, "admin");

        // Later profile edits leave the issued invoice alone
        let renamed = BusinessProfile {
            company_name: "Renamed Ltd".to_string(),
            ..Default::default()
        };
        state
            .db
            .users()
            .update_business_profile("admin", &renamed)
            .await
            .unwrap();

        let stored = service.get(&invoice.id).await.unwrap();
        assert_eq!(stored.business_profile.unwrap().company_name, "My Business");
    }

    #[tokio::test]
    async fn test_discounted_amounts_trusted_unless_strict() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;
        let discounted = || draft(&[(2.0, 10000, 18000)]);

        let invoice = InvoiceService::new(state).create(discounted(), &admin).await.unwrap();
        assert_eq!(invoice.subtotal_cents, 18000);

        let strict = test_support::state_with(ApiConfig {
            strict_line_amounts: true,
            ..Default::default()
        })
        .await;
        let admin = test_support::admin(&strict).await;
        let err = InvoiceService::new(strict)
            .create(discounted(), &admin)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_empty_invoice_rejected_without_consuming_a_number() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;
        let service = InvoiceService::new(state);

        let err = service.create(draft(&[]), &admin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let invoice = service.create(draft(&[(1.0, 100, 100)]), &admin).await.unwrap();
        assert_eq!(invoice.invoice_number, "INV-0001");
    }

    #[tokio::test]
    async fn test_set_status() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;
        let service = InvoiceService::new(state);
        let invoice = service.create(draft(&[(1.0, 100, 100)]), &admin).await.unwrap();

        let paid = service.set_status(&invoice.id, "PAID").await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);

        let err = service.set_status(&invoice.id, "archived").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = service.set_status("missing", "sent").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_render_pdf() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;
        let service = InvoiceService::new(state);
        let invoice = service.create(draft(&[(1.0, 100, 100)]), &admin).await.unwrap();

        let pdf = service.render_pdf(&invoice.id).await.unwrap();
        assert_eq!(pdf.filename, "INV-0001.pdf");
        assert!(pdf.bytes.starts_with(b"%PDF-1.5"));

        let err = service.render_pdf("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
