//! PDF Core - Low-level PDF overlay stamping
//!
//! This crate provides functionality for:
//! - Opening a base (template) PDF document
//! - Drawing text and lines on a transparent overlay page
//! - Compositing an overlay onto a page of the base document
//! - Measuring text set in the built-in Times fonts
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, BuiltinFont, Overlay, PdfDocument};
//!
//! let mut overlay = Overlay::letter();
//! overlay.set_font(BuiltinFont::TimesBold, 12.0);
//! overlay.draw_text("Hello, World!", 73.0, 656.0, Align::Left);
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! doc.stamp_overlay(1, &overlay)?;
//! doc.retain_first_page()?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod overlay;
mod text;

pub use document::{Color, PdfDocument};
pub use font::{encode_win_ansi, BuiltinFont};
pub use overlay::{Overlay, LETTER_HEIGHT, LETTER_WIDTH};
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Template file '{0}' not found")]
    TemplateNotFound(String),

    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_template_not_found_message() {
        let err = PdfError::TemplateNotFound("template.pdf".to_string());
        assert_eq!(err.to_string(), "Template file 'template.pdf' not found");
    }
}
