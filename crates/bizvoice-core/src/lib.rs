//! # bizvoice-core: Pure Business Logic for Bizvoice
//!
//! This crate is the **heart** of Bizvoice. It contains the invoicing rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bizvoice Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Login ──► Catalog ──► Invoice Editor ──► PDF Download       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    auth gate, services, routes                                  │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────────────────▼───────────────────┐   │
//! │  │               ★ bizvoice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  totals   │  │   rules   │  │   │
//! │  │   │  Invoice  │  │  TaxRate  │  │  assemble │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐   │
//! │  │  bizvoice-db (SQLite)       │  │  bizvoice-pdf (renderer)        │   │
//! │  └─────────────────────────────┘  └─────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Invoice, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice totals, numbering and assembly
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bizvoice_core::money::Money;
//! use bizvoice_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(30000); // Rs. 300.00
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(1800));
//! assert_eq!(tax.cents(), 5400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use invoice::{format_invoice_number, validate_draft, InvoiceTotals, TaxSplit};
pub use money::{Money, CURRENCY_SYMBOL};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Standard GST slab applied when a draft does not name a rate (18%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Prefix of every invoice number ("INV-0001").
pub const INVOICE_NUMBER_PREFIX: &str = "INV";

/// Unit label for products created without one.
pub const DEFAULT_UNIT: &str = "pcs";

/// Maximum rows returned by product and invoice listings.
pub const MAX_LIST_RESULTS: i64 = 1000;

/// Maximum hits returned by product search.
///
/// ## Business Reason
/// Search feeds an autocomplete dropdown in the invoice editor.
pub const MAX_SEARCH_RESULTS: i64 = 10;

/// Number of entries in the dashboard's top-products ranking.
pub const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Maximum lines on a single invoice.
pub const MAX_INVOICE_ITEMS: usize = 500;

/// Largest magnitude accepted for any single price or line amount, in paise
/// (Rs. 10 trillion).
///
/// ## Business Reason
/// `MAX_INVOICE_ITEMS` lines at this bound, plus 100% tax, still fit in an
/// `i64`, so invoice totals never overflow.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;
