//! Invoice layout schema types
//!
//! Every coordinate of the printed invoice lives here. All values are PDF
//! points with the origin at the bottom-left corner of the page. Each struct
//! is `#[serde(default)]`, so a layout file only needs the keys it changes.

use pdf_core::BuiltinFont;
use serde::{Deserialize, Serialize};

/// Footer printed below the charge table of the stock form
pub const DEFAULT_FOOTER_LINES: [&str; 6] = [
    "Please credit the expenses in our account",
    "Account Name :- Sai Agro Inputs",
    "Account No. :- 921020042670090",
    "IFSC Code :- UTIB0000749",
    "Bank :- Axis Bank",
    "Branch :- Amankha Plot Road Akola",
];

/// Position in points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Page size in points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self {
            width: pdf_core::LETTER_WIDTH,
            height: pdf_core::LETTER_HEIGHT,
        }
    }
}

/// Font style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
}

/// Font face and size
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Font {
    #[serde(default)]
    pub style: FontStyle,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub size: f32,
}

fn default_font_size() -> f32 {
    12.0
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self {
            style: FontStyle::Regular,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            style: FontStyle::Bold,
            size,
        }
    }

    /// The built-in Times face for this style
    pub fn builtin(&self) -> BuiltinFont {
        match self.style {
            FontStyle::Regular => BuiltinFont::TimesRoman,
            FontStyle::Bold => BuiltinFont::TimesBold,
        }
    }
}

/// Party name and address block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NameBlock {
    /// Baseline of the first line
    pub position: Position,
    #[serde(rename = "firstLineFont")]
    pub first_line_font: Font,
    /// Font of the continuation lines
    pub font: Font,
    /// Baseline distance between lines
    #[serde(rename = "lineStep")]
    pub line_step: f64,
}

impl Default for NameBlock {
    fn default() -> Self {
        Self {
            position: Position::new(73.0, 656.0),
            first_line_font: Font::bold(12.0),
            font: Font::regular(12.0),
            line_step: 14.0,
        }
    }
}

/// Invoice date and billing period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DateBlock {
    pub font: Font,
    pub date: Position,
    #[serde(rename = "fromDate")]
    pub from_date: Position,
    #[serde(rename = "toDate")]
    pub to_date: Position,
}

impl Default for DateBlock {
    fn default() -> Self {
        Self {
            font: Font::regular(11.0),
            date: Position::new(467.0, 715.0),
            from_date: Position::new(310.0, 547.0),
            to_date: Position::new(385.0, 547.0),
        }
    }
}

/// Charge table
///
/// The table has four columns (SR, PARTICULAR, AMOUNT, REMARK) and grows
/// downward from its top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableLayout {
    /// Top-left corner
    pub position: Position,
    #[serde(rename = "columnWidths")]
    pub column_widths: [f64; 4],
    #[serde(rename = "rowHeight")]
    pub row_height: f64,
    /// Grid stroke width
    #[serde(rename = "lineWidth")]
    pub line_width: f64,
    /// Horizontal inset of left- and right-aligned cell text
    pub padding: f64,
    pub headers: [String; 4],
    #[serde(rename = "headerFont")]
    pub header_font: Font,
    #[serde(rename = "bodyFont")]
    pub body_font: Font,
    #[serde(rename = "totalFont")]
    pub total_font: Font,
    #[serde(rename = "totalLabel")]
    pub total_label: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            position: Position::new(60.0, 510.0),
            column_widths: [40.0, 230.0, 90.0, 132.0],
            row_height: 18.0,
            line_width: 0.8,
            padding: 6.0,
            headers: [
                "SR".to_string(),
                "PARTICULAR".to_string(),
                "AMOUNT".to_string(),
                "REMARK".to_string(),
            ],
            header_font: Font::bold(11.0),
            body_font: Font::regular(10.0),
            total_font: Font::bold(10.0),
            total_label: "TOTAL".to_string(),
        }
    }
}

impl TableLayout {
    pub fn width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    /// Left edge of column `index`
    pub fn column_x(&self, index: usize) -> f64 {
        self.position.x + self.column_widths.iter().take(index).sum::<f64>()
    }

    /// Bottom edge of a table with `rows` rows
    pub fn bottom(&self, rows: usize) -> f64 {
        self.position.y - self.row_height * rows as f64
    }
}

/// Static note printed under the table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FooterNote {
    pub x: f64,
    /// Distance from the table bottom to the first baseline
    pub gap: f64,
    pub font: Font,
    #[serde(rename = "lineStep")]
    pub line_step: f64,
    pub lines: Vec<String>,
}

impl Default for FooterNote {
    fn default() -> Self {
        Self {
            x: 60.0,
            gap: 40.0,
            font: Font::regular(12.0),
            line_step: 14.0,
            lines: DEFAULT_FOOTER_LINES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Complete invoice layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InvoiceLayout {
    pub page: PageSize,
    pub name: NameBlock,
    pub dates: DateBlock,
    pub table: TableLayout,
    pub footer: FooterNote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_geometry() {
        let table = TableLayout::default();
        assert_eq!(table.width(), 492.0);
        assert_eq!(table.column_x(0), 60.0);
        assert_eq!(table.column_x(2), 330.0);
        assert_eq!(table.column_x(4), 552.0);
        assert_eq!(table.bottom(3), 456.0);
    }

    #[test]
    fn test_font_builtin() {
        assert_eq!(Font::bold(12.0).builtin(), BuiltinFont::TimesBold);
        assert_eq!(Font::regular(10.0).builtin(), BuiltinFont::TimesRoman);
    }

    #[test]
    fn test_default_page_is_letter() {
        let layout = InvoiceLayout::default();
        assert_eq!(layout.page.width, 612.0);
        assert_eq!(layout.page.height, 792.0);
        assert_eq!(layout.footer.lines.len(), 6);
    }
}
