//! Layout JSON parsing

use crate::{InvoiceLayout, Result, TemplateError};
use std::path::Path;

/// Parse a layout from a JSON string
///
/// Keys that are left out keep their default values.
pub fn parse_layout(json: &str) -> Result<InvoiceLayout> {
    let layout: InvoiceLayout =
        serde_json::from_str(json).map_err(|e| TemplateError::ParseError(e.to_string()))?;
    validate_layout(&layout)?;
    Ok(layout)
}

/// Read and parse a layout file
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<InvoiceLayout> {
    let json = std::fs::read_to_string(path)?;
    parse_layout(&json)
}

fn validate_layout(layout: &InvoiceLayout) -> Result<()> {
    if layout.page.width <= 0.0 || layout.page.height <= 0.0 {
        return Err(TemplateError::ParseError(
            "page size must be positive".to_string(),
        ));
    }
    if layout.table.row_height <= 0.0 {
        return Err(TemplateError::ParseError(
            "table rowHeight must be positive".to_string(),
        ));
    }
    if layout.table.column_widths.iter().any(|w| *w < 0.0) {
        return Err(TemplateError::ParseError(
            "table columnWidths must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Font, Position};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_layout_is_default() {
        let layout = parse_layout("{}").unwrap();
        assert_eq!(layout, InvoiceLayout::default());
    }

    #[test]
    fn test_parse_partial_override() {
        let json = r#"{
            "dates": { "date": { "x": 450, "y": 720 } },
            "table": { "rowHeight": 20, "bodyFont": { "size": 9 } },
            "footer": { "lines": ["Thank you"] }
        }"#;

        let layout = parse_layout(json).unwrap();
        assert_eq!(layout.dates.date, Position::new(450.0, 720.0));
        assert_eq!(layout.dates.from_date, Position::new(310.0, 547.0));
        assert_eq!(layout.table.row_height, 20.0);
        assert_eq!(layout.table.body_font, Font::regular(9.0));
        assert_eq!(layout.table.column_widths, [40.0, 230.0, 90.0, 132.0]);
        assert_eq!(layout.footer.lines, vec!["Thank you".to_string()]);
    }

    #[test]
    fn test_parse_bold_style() {
        let layout = parse_layout(r#"{ "name": { "font": { "style": "bold", "size": 13 } } }"#)
            .unwrap();
        assert_eq!(layout.name.font, Font::bold(13.0));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_layout("{ not json");
        assert!(matches!(result, Err(TemplateError::ParseError(_))));
    }

    #[test]
    fn test_parse_wrong_column_count() {
        let result = parse_layout(r#"{ "table": { "columnWidths": [10, 20] } }"#);
        assert!(matches!(result, Err(TemplateError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_zero_row_height() {
        let result = parse_layout(r#"{ "table": { "rowHeight": 0 } }"#);
        assert!(matches!(result, Err(TemplateError::ParseError(_))));
    }
}
