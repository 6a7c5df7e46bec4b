//! Vector graphics operators (lines and rectangles)

use crate::document::Color;

/// Stroke/fill settings for a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in points
    pub width: f64,
    /// Stroke color
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 0.5,
            color: Color::black(),
        }
    }
}

/// Generate operators for a straight line segment
///
/// Coordinates are PDF coordinates (origin bottom-left).
pub fn generate_line_operators(x1: f64, y1: f64, x2: f64, y2: f64, style: &StrokeStyle) -> Vec<u8> {
    let c = style.color;
    format!(
        "q\n{} {} {} RG\n{} w\n{x1} {y1} m\n{x2} {y2} l\nS\nQ\n",
        c.r, c.g, c.b, style.width
    )
    .into_bytes()
}

/// Generate operators for a filled rectangle
///
/// # Arguments
/// * `x` - Left edge in points
/// * `y` - Bottom edge in points (PDF coordinates)
/// * `width` - Width in points
/// * `height` - Height in points
/// * `color` - Fill color
pub fn generate_fill_rect_operators(x: f64, y: f64, width: f64, height: f64, color: Color) -> Vec<u8> {
    format!(
        "q\n{} {} {} rg\n{x} {y} {width} {height} re\nf\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators for a stroked rectangle outline
pub fn generate_stroke_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    style: &StrokeStyle,
) -> Vec<u8> {
    let c = style.color;
    format!(
        "q\n{} {} {} RG\n{} w\n{x} {y} {width} {height} re\nS\nQ\n",
        c.r, c.g, c.b, style.width
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_operators() {
        let ops = generate_line_operators(10.0, 20.0, 110.0, 20.0, &StrokeStyle::default());
        assert_eq!(
            String::from_utf8(ops).unwrap(),
            "q\n0 0 0 RG\n0.5 w\n10 20 m\n110 20 l\nS\nQ\n"
        );
    }

    #[test]
    fn test_fill_rect_operators() {
        let ops = generate_fill_rect_operators(0.0, 0.0, 50.0, 25.0, Color::white());
        assert_eq!(
            String::from_utf8(ops).unwrap(),
            "q\n1 1 1 rg\n0 0 50 25 re\nf\nQ\n"
        );
    }

    #[test]
    fn test_stroke_rect_operators() {
        let style = StrokeStyle {
            width: 1.0,
            color: Color::rgb(0.2, 0.2, 0.2),
        };
        let ops = generate_stroke_rect_operators(5.0, 5.0, 10.0, 10.0, &style);
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("0.2 0.2 0.2 RG"));
        assert!(ops_str.contains("1 w"));
        assert!(ops_str.contains("5 5 10 10 re\nS"));
    }
}
