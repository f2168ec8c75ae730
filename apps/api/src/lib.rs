//! # Bizvoice API
//!
//! HTTP server for the Bizvoice invoicing frontend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Browser ──► axum (8001) ──► routes ──► services ──► bizvoice-db      │
//! │                 │              │            │                           │
//! │            CORS, trace    CurrentUser   bizvoice-core rules            │
//! │                           (Bearer JWT)  bizvoice-pdf rendering         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐
//! │  AuthService   │  │ ProductService │  │  InvoiceService            │
//! │                │  │                │  │                            │
//! │ • login        │  │ • create/list  │  │ • create (numbered)        │
//! │ • resolve_token│  │ • search       │  │ • get/list                 │
//! │ • create_user  │  │ • update       │  │ • set_status               │
//! │ • profile      │  │ • price_history│  │ • render_pdf               │
//! └────────────────┘  └────────────────┘  └────────────────────────────┘
//! ```
//!
//! ## Configuration
//! `bizvoice.toml` and `BIZVOICE_*` environment variables, see [`config`].

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;
