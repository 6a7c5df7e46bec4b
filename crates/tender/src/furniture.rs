//! Running header and footer stamped on every page
//!
//! The header is the company logo in a fixed box at the top right, or a
//! two-line text wordmark when the logo cannot be loaded. The footer is a
//! horizontal rule with the company contact details below it.

use crate::asset::AssetLoader;
use crate::canvas::{Canvas, TextStyle};
use crate::config::TenderConfig;
use crate::cursor::PageCursorState;
use crate::Result;
use log::warn;
use pdf_core::{Align, Color};

/// Top-left corner of the logo box
pub const LOGO_TOP: f64 = 10.0;
pub const LOGO_WIDTH: f64 = 50.0;
pub const LOGO_HEIGHT: f64 = 20.0;

/// Distance of the footer rule from the bottom edge
pub const FOOTER_RULE_OFFSET: f64 = 25.0;
const FOOTER_RULE_WIDTH: f64 = 0.3;
/// First footer baseline below the rule
const FOOTER_TEXT_OFFSET: f64 = 5.0;
const FOOTER_LINE_GAP: f64 = 4.0;

const WORDMARK_SIZE: f32 = 16.0;

/// Brand color of the wordmark
pub fn wordmark_color() -> Color {
    Color::from_rgb(24, 54, 92)
}

/// Stamp the logo (or wordmark) and the footer on the current page
///
/// A logo that was decoded on an earlier page is reused. Until one has been
/// decoded every page tries the loader again; a failure only produces a
/// warning and the text wordmark. The canvas style is left unchanged.
pub async fn stamp_page_furniture<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &mut PageCursorState,
    config: &TenderConfig,
    loader: &dyn AssetLoader,
) -> Result<()> {
    let saved = canvas.style();

    stamp_logo(canvas, cursor, config, loader).await?;
    stamp_footer(canvas, cursor, config)?;

    canvas.set_style(saved);
    Ok(())
}

async fn stamp_logo<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &mut PageCursorState,
    config: &TenderConfig,
    loader: &dyn AssetLoader,
) -> Result<()> {
    let x = cursor.page_width - cursor.margins.right - LOGO_WIDTH;

    if cursor.logo.is_none() {
        if let Some(path) = &config.logo_path {
            match loader.load_image(path).await {
                Ok(image) => cursor.logo = Some(image),
                Err(e) => warn!("Logo unavailable on page {}: {e}", cursor.page_number),
            }
        }
    }

    match &cursor.logo {
        Some(logo) => canvas.draw_image(logo, x, LOGO_TOP, LOGO_WIDTH, LOGO_HEIGHT),
        None => stamp_wordmark(canvas, cursor, config),
    }
}

fn stamp_wordmark<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &PageCursorState,
    config: &TenderConfig,
) -> Result<()> {
    let company = &config.company;
    let right = cursor.page_width - cursor.margins.right;
    let color = wordmark_color();

    let primary = TextStyle::bold(WORDMARK_SIZE).with_color(color);
    let primary_baseline = LOGO_TOP + primary.ascent();
    canvas.set_style(primary);
    canvas.draw_text(&company.wordmark_primary, right, primary_baseline, Align::Right)?;

    let secondary = TextStyle::regular(config.typography.small_size).with_color(color);
    let secondary_baseline = primary_baseline + secondary.ascent() + 2.0;
    canvas.set_style(secondary);
    canvas.draw_text(
        &company.wordmark_secondary,
        right,
        secondary_baseline,
        Align::Right,
    )
}

fn stamp_footer<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &PageCursorState,
    config: &TenderConfig,
) -> Result<()> {
    let company = &config.company;
    let left = cursor.margins.left;
    let right = cursor.page_width - cursor.margins.right;
    let rule_y = cursor.page_height - FOOTER_RULE_OFFSET;

    canvas.draw_line(left, rule_y, right, rule_y, FOOTER_RULE_WIDTH)?;

    let small = TextStyle::regular(config.typography.small_size).with_color(Color::gray(0.3));
    canvas.set_style(small);

    let first = rule_y + FOOTER_TEXT_OFFSET;
    let left_block = [
        company.name.clone(),
        company.address.clone(),
        company.email.clone(),
    ];
    let right_block = [
        format!("Phone: {}", company.phone),
        format!("Fax: {}", company.fax),
        company.website.clone(),
    ];

    for (i, (left_line, right_line)) in left_block.iter().zip(&right_block).enumerate() {
        let y = first + i as f64 * FOOTER_LINE_GAP;
        canvas.draw_text(left_line, left, y, Align::Left)?;
        canvas.draw_text(right_line, right, y, Align::Right)?;
    }

    Ok(())
}
