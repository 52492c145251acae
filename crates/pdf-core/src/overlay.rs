//! Overlay canvas
//!
//! An overlay is a transparent page of drawing operators. Coordinates are
//! native PDF user space: origin at the bottom-left corner, y growing upward.

use crate::document::{Color, PdfDocument};
use crate::font::{encode_win_ansi, to_literal_string, BuiltinFont};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, Result};
use std::collections::BTreeSet;

/// US Letter width in points
pub const LETTER_WIDTH: f64 = 612.0;
/// US Letter height in points
pub const LETTER_HEIGHT: f64 = 792.0;

/// A one-page vector overlay built from text and line operators
#[derive(Debug, Clone)]
pub struct Overlay {
    width: f64,
    height: f64,
    content: Vec<u8>,
    fonts: BTreeSet<BuiltinFont>,
    current_font: BuiltinFont,
    current_font_size: f32,
    current_line_width: f64,
}

impl Overlay {
    /// Create an empty overlay of the given page size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: Vec::new(),
            fonts: BTreeSet::new(),
            current_font: BuiltinFont::default(),
            current_font_size: 12.0,
            current_line_width: 1.0,
        }
    }

    /// Create an empty US Letter overlay
    pub fn letter() -> Self {
        Self::new(LETTER_WIDTH, LETTER_HEIGHT)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the font and size for subsequent text
    pub fn set_font(&mut self, font: BuiltinFont, size: f32) {
        self.current_font = font;
        self.current_font_size = size;
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.current_line_width = width;
    }

    /// Width of `text` in the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    /// Draw a single line of text with its baseline at `y`
    ///
    /// `x` is the left edge, centre or right edge depending on `align`.
    /// Empty text draws nothing.
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, align: Align) {
        if text.is_empty() {
            return;
        }

        let literal = to_literal_string(&encode_win_ansi(text));
        let ctx = TextRenderContext {
            font_name: self.current_font.resource_name().to_string(),
            font_size: self.current_font_size,
            text_width: self.text_width(text),
            color: Color::black(),
        };

        let ops = generate_text_operators(&literal, x, y, align, &ctx);
        self.content.extend_from_slice(&ops);
        self.fonts.insert(self.current_font);
    }

    /// Stroke a straight line
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let ops = format!(
            "0 0 0 RG\n{} w\n{x1} {y1} m\n{x2} {y2} l\nS\n",
            self.current_line_width,
        );
        self.content.extend_from_slice(ops.as_bytes());
    }

    /// Raw content stream operators
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Fonts referenced by the content
    pub fn fonts(&self) -> impl Iterator<Item = BuiltinFont> + '_ {
        self.fonts.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Render the overlay alone on a blank page of its own size
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::blank(self.width, self.height)?;
        doc.stamp_overlay(1, self)?;
        doc.to_bytes()
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::letter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_str(overlay: &Overlay) -> String {
        String::from_utf8(overlay.content().to_vec()).unwrap()
    }

    #[test]
    fn test_letter_size() {
        let overlay = Overlay::letter();
        assert_eq!(overlay.width(), 612.0);
        assert_eq!(overlay.height(), 792.0);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_draw_text_records_font() {
        let mut overlay = Overlay::letter();
        overlay.set_font(BuiltinFont::TimesBold, 12.0);
        overlay.draw_text("Acme", 73.0, 656.0, Align::Left);

        let content = content_str(&overlay);
        assert!(content.contains("/BpTimesBold 12 Tf"));
        assert!(content.contains("73 656 Td"));
        assert!(content.contains("(Acme) Tj"));
        assert_eq!(overlay.fonts().collect::<Vec<_>>(), vec![BuiltinFont::TimesBold]);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut overlay = Overlay::letter();
        overlay.draw_text("", 10.0, 10.0, Align::Left);
        assert!(overlay.is_empty());
        assert_eq!(overlay.fonts().count(), 0);
    }

    #[test]
    fn test_right_aligned_text() {
        let mut overlay = Overlay::letter();
        overlay.set_font(BuiltinFont::TimesRoman, 10.0);
        overlay.draw_text("100.00", 100.0, 50.0, Align::Right);

        // width of "100.00" at 10pt is 27.5
        assert!(content_str(&overlay).contains("72.5 50 Td"));
    }

    #[test]
    fn test_line() {
        let mut overlay = Overlay::letter();
        overlay.set_line_width(0.8);
        overlay.line(60.0, 510.0, 552.0, 510.0);

        assert_eq!(content_str(&overlay), "0 0 0 RG\n0.8 w\n60 510 m\n552 510 l\nS\n");
    }

    #[test]
    fn test_text_is_black() {
        let mut overlay = Overlay::letter();
        overlay.set_font(BuiltinFont::TimesRoman, 10.0);
        overlay.draw_text("Rent", 5.0, 5.0, Align::Left);

        assert!(content_str(&overlay).starts_with("BT\n0 0 0 rg\n"));
    }

    #[test]
    fn test_to_pdf_bytes_is_loadable() {
        let mut overlay = Overlay::letter();
        overlay.draw_text("Hello", 10.0, 10.0, Align::Left);
        let bytes = overlay.to_pdf_bytes().unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
