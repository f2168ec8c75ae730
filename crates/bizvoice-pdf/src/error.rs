//! Renderer errors.
//!
//! The API never shows these to clients: it logs the cause and answers with
//! an opaque `RENDER_FAILED`.

use thiserror::Error;

/// Anything that can go wrong while laying out or serializing a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// lopdf rejected an object or content stream.
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Writing the document into the output buffer failed.
    #[error("PDF serialization failed: {0}")]
    Io(#[from] std::io::Error),

    /// The invoice cannot be laid out (e.g. a single row taller than a page).
    #[error("Layout failed: {0}")]
    Layout(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
