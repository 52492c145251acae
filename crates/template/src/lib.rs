//! Template - invoice layout and rendering
//!
//! This crate provides:
//! - The invoice layout schema (every coordinate of the printed form)
//! - Layout parsing from JSON, with defaults for anything left out
//! - Charge table rows with print filtering and serial numbering
//! - Overlay building and stamping onto page one of the template PDF
//!
//! # Example
//!
//! ```ignore
//! use template::{InvoiceLayout, InvoiceRenderer};
//!
//! let layout = InvoiceLayout::default();
//! let pdf_bytes = InvoiceRenderer::new(&layout).render_file("template.pdf", &record)?;
//! ```

mod parser;
mod renderer;
mod schema;

pub use parser::{load_layout, parse_layout};
pub use renderer::{table_rows, InvoiceRenderer, RowKind, TableRow};
pub use schema::*;

use thiserror::Error;

/// Errors that can occur during invoice rendering
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse layout: {0}")]
    ParseError(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TemplateError {
    /// Whether the base template file is missing
    pub fn is_template_missing(&self) -> bool {
        matches!(self, TemplateError::Pdf(pdf_core::PdfError::TemplateNotFound(_)))
    }
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_missing() {
        let err = TemplateError::from(pdf_core::PdfError::TemplateNotFound("t.pdf".to_string()));
        assert!(err.is_template_missing());
        assert_eq!(err.to_string(), "PDF error: Template file 't.pdf' not found");
        assert!(!TemplateError::ParseError("x".to_string()).is_template_missing());
    }
}
