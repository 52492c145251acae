//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "BpTimesRoman")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render text
/// at a specific position. `x` is the anchor point: the left edge, the centre
/// or the right edge of the text depending on `align`.
///
/// # Arguments
/// * `text_literal` - PDF literal string (e.g., "(Hello)")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Baseline Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_literal: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let final_x = x + x_offset;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{text_literal} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(font_name: &str, font_size: f32, text_width: f64) -> TextRenderContext {
        TextRenderContext {
            font_name: font_name.to_string(),
            font_size,
            text_width,
            color: Color::black(),
        }
    }

    #[test]
    fn test_generate_text_operators_left() {
        let ops = generate_text_operators(
            "(Hello)",
            73.0,
            656.0,
            Align::Left,
            &ctx("F1", 12.0, 30.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("BT\n"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("73 656 Td"));
        assert!(ops_str.contains("(Hello) Tj"));
        assert!(ops_str.ends_with("ET\n"));
    }

    #[test]
    fn test_generate_text_operators_center() {
        let ops = generate_text_operators(
            "(Test)",
            200.0,
            600.0,
            Align::Center,
            &ctx("F2", 14.0, 100.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("150 600 Td")); // 200 - 50
    }

    #[test]
    fn test_generate_text_operators_right() {
        let ops = generate_text_operators(
            "(Right)",
            300.0,
            500.0,
            Align::Right,
            &ctx("F3", 16.0, 80.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("/F3 16 Tf"));
        assert!(ops_str.contains("220 500 Td")); // 300 - 80
    }

    #[test]
    fn test_generate_text_operators_with_color() {
        let mut context = ctx("F1", 12.0, 10.0);
        context.color = Color::rgb(1.0, 0.0, 0.0);
        let ops = generate_text_operators("(A)", 100.0, 700.0, Align::Left, &context);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("1 0 0 rg"));
    }
}
