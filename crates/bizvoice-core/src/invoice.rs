//! # Invoice Assembly
//!
//! Turns a client [`InvoiceDraft`] into a complete [`Invoice`].
//!
//! ## Assembly Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InvoiceDraft ──► validate_draft() ──► InvoiceTotals::compute()        │
//! │  (customer,          │                    subtotal = Σ amount           │
//! │   items, rate)       │ strict?            tax      = subtotal × rate    │
//! │                      ▼                    total    = subtotal + tax     │
//! │               amount == qty × rate              │                       │
//! │                                                 ▼                       │
//! │  sequence (from store) ──► format_invoice_number() ──► Invoice::assemble│
//! │                                 "INV-0042"             + profile copy   │
//! │                                                        + status draft   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sequence number itself comes from the database layer, which hands it
//! to a closure that calls [`Invoice::assemble`] inside the insert
//! transaction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BusinessProfile, Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus, TaxRate};
use crate::validation::{
    validate_customer_name, validate_item_count, validate_line_amount_cents,
    validate_price_cents, validate_product_name, validate_quantity, validate_tax_rate_bps,
};
use crate::INVOICE_NUMBER_PREFIX;

/// Formats a sequence value as a human-facing invoice number.
///
/// ```rust
/// use bizvoice_core::invoice::format_invoice_number;
///
/// assert_eq!(format_invoice_number(7), "INV-0007");
/// assert_eq!(format_invoice_number(12345), "INV-12345");
/// ```
pub fn format_invoice_number(sequence: i64) -> String {
    format!("{}-{:04}", INVOICE_NUMBER_PREFIX, sequence)
}

// =============================================================================
// Totals
// =============================================================================

/// Subtotal, tax and grand total of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Sums the supplied line amounts and applies `rate` once to the subtotal.
    pub fn compute(items: &[InvoiceItem], rate: TaxRate) -> Self {
        let subtotal: Money = items.iter().map(InvoiceItem::amount).sum();
        let tax = subtotal.calculate_tax(rate);
        InvoiceTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Intra-state GST shown as two equal halves.
///
/// Display only: the stored invoice carries a single tax amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxSplit {
    /// Percentage each half is charged at (9.0 for 18% GST).
    pub half_rate: f64,
    pub cgst: Money,
    pub sgst: Money,
}

impl TaxSplit {
    pub fn of(invoice: &Invoice) -> Self {
        let (cgst, sgst) = invoice.tax().split_even();
        TaxSplit {
            half_rate: invoice.tax_rate().half_percentage(),
            cgst,
            sgst,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Checks a draft before any number is allocated for it.
///
/// With `strict_amounts` every line must satisfy
/// `amount == round(quantity × rate)`; otherwise the client's amount is
/// trusted so that manual discounts survive.
pub fn validate_draft(draft: &InvoiceDraft, strict_amounts: bool) -> CoreResult<()> {
    validate_customer_name(&draft.customer.name)?;
    validate_item_count(draft.items.len())?;
    validate_tax_rate_bps(draft.tax_rate_bps)?;

    for (index, item) in draft.items.iter().enumerate() {
        validate_product_name(&item.product_name)?;
        validate_quantity(item.quantity)?;
        validate_price_cents(item.rate_cents)?;
        validate_line_amount_cents(item.amount_cents)?;

        if strict_amounts {
            let expected = item.expected_amount();
            if expected != item.amount() {
                return Err(CoreError::LineAmountMismatch {
                    line: index + 1,
                    expected: expected.cents(),
                    actual: item.amount_cents,
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Assembly
// =============================================================================

impl Invoice {
    /// Builds a new draft-status invoice.
    ///
    /// `profile` is moved in, so the invoice owns its own copy of the
    /// issuer's details from this moment on.
    pub fn assemble(
        draft: InvoiceDraft,
        invoice_number: String,
        created_by: &str,
        profile: Option<BusinessProfile>,
        now: DateTime<Utc>,
    ) -> Invoice {
        let rate = TaxRate::from_bps(draft.tax_rate_bps);
        let totals = InvoiceTotals::compute(&draft.items, rate);

        Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            customer: draft.customer,
            items: draft.items,
            subtotal_cents: totals.subtotal.cents(),
            tax_rate_bps: rate.bps(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            bank_details: draft.bank_details,
            notes: draft.notes,
            status: InvoiceStatus::Draft,
            created_by: created_by.to_string(),
            business_profile: profile,
            invoice_date: now,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
