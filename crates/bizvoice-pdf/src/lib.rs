//! # bizvoice-pdf: Invoice Renderer
//!
//! Turns a stored [`Invoice`](bizvoice_core::Invoice) into a printable PDF.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  &Invoice ──► render ──► Layout ──► pages of lopdf Operations           │
//! │               sections     cursor,       │                              │
//! │               in order     page breaks   ▼                              │
//! │                                     build_document()                    │
//! │                                     fonts, page tree, compress          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                      Vec<u8>                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering touches no clock, file or network, so it is safe to call from
//! any number of request handlers at once and always returns the same
//! bytes for the same invoice.

pub mod error;
pub mod layout;
pub mod render;

pub use error::{RenderError, RenderResult};
pub use render::render_invoice;
