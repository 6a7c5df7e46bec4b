//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Starting X for text anchored at `x` with the given alignment
pub fn aligned_x(x: f64, text_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => x,
        Align::Center => x - text_width / 2.0,
        Align::Right => x - text_width,
    }
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render text
/// at a specific position with alignment support.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<48656C6C6F>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Baseline Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to `x`
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let final_x = aligned_x(x, ctx.text_width, align);

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(font_name: &str, font_size: f32, text_width: f64) -> TextRenderContext {
        TextRenderContext {
            font_name: font_name.to_string(),
            font_size,
            text_width,
            color: Color::black(),
        }
    }

    #[test]
    fn test_aligned_x() {
        assert_eq!(aligned_x(200.0, 100.0, Align::Left), 200.0);
        assert_eq!(aligned_x(200.0, 100.0, Align::Center), 150.0);
        assert_eq!(aligned_x(200.0, 100.0, Align::Right), 100.0);
    }

    #[test]
    fn test_generate_text_operators_left() {
        let ops = generate_text_operators(
            "<48656C6C6F>",
            100.0,
            700.0,
            Align::Left,
            &context("F1", 12.0, 100.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("BT\n"));
        assert!(ops_str.contains("0 0 0 rg"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("<48656C6C6F> Tj"));
        assert!(ops_str.ends_with("ET\n"));
    }

    #[test]
    fn test_generate_text_operators_right() {
        let ops = generate_text_operators(
            "<54657374>",
            500.0,
            600.0,
            Align::Right,
            &context("F2", 9.0, 120.0),
        );
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("/F2 9 Tf"));
        assert!(ops_str.contains("380 600 Td"));
    }

    #[test]
    fn test_generate_text_operators_color() {
        let mut ctx = context("F1", 10.0, 0.0);
        ctx.color = Color::rgb(0.5, 0.25, 1.0);
        let ops = generate_text_operators("<41>", 0.0, 0.0, Align::Left, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("0.5 0.25 1 rg"));
    }
}
