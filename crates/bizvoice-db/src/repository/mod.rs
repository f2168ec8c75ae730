//! # Repository Module
//!
//! Database repository implementations for Bizvoice.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  HTTP handler → service                                                │
//! │       │                                                                 │
//! │       │  db.products().update(id, &changes, "alice")                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query, limit)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, id, changes, changed_by)  ← one transaction         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts, credentials, business profiles
//! - [`ProductRepository`](product::ProductRepository) - Catalog and price history
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Numbered invoices
//! - [`ReportRepository`](report::ReportRepository) - Dashboard aggregates

pub mod invoice;
pub mod product;
pub mod report;
pub mod user;
