//! Dashboard statistics service.

use std::sync::Arc;

use chrono::Utc;

use bizvoice_core::DashboardStats;

use crate::error::ApiError;
use crate::state::AppState;

/// Revenue figures behind `/api/dashboard/stats`. Computed on every call.
pub struct DashboardService {
    state: Arc<AppState>,
}

impl DashboardService {
    pub fn new(state: Arc<AppState>) -> Self {
        DashboardService { state }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(self.state.db.reports().dashboard_stats(Utc::now()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use crate::services::InvoiceService;
    use bizvoice_core::{Customer, InvoiceDraft, InvoiceItem};

    #[tokio::test]
    async fn test_stats_follow_created_invoices() {
        let state = test_support::state().await;
        let admin = test_support::admin(&state).await;

        let draft = InvoiceDraft {
            customer: Customer {
                name: "Acme".to_string(),
                email: None,
                phone: None,
                address: None,
                city: None,
                state: None,
                pincode: None,
                gst_number: None,
            },
            items: vec![InvoiceItem {
                product_id: "w".to_string(),
                product_name: "Widget".to_string(),
                description: None,
                quantity: 2.0,
                rate_cents: 5000,
                amount_cents: 10000,
            }],
            tax_rate_bps: 1800,
            bank_details: None,
            notes: None,
            due_date: None,
        };
        InvoiceService::new(state.clone()).create(draft, &admin).await.unwrap();

        let stats = DashboardService::new(state).stats().await.unwrap();
        assert_eq!(stats.total_invoices, 1);
        assert_eq!(stats.total_revenue_cents, 11800);
        assert_eq!(stats.monthly_revenue_cents, 11800);
        assert_eq!(stats.top_products.len(), 1);
        assert_eq!(stats.top_products[0].name, "Widget");
        assert_eq!(stats.top_products[0].amount_cents, 10000);
    }
}
