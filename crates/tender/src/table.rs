//! Fixed-grid tables with a trailing summary block
//!
//! A table is drawn in one piece: header band, as many data rows as fit
//! above the summary block, the summary bands and one outer border. Rows
//! that do not fit are clipped, the table itself never continues on the
//! next page.

use crate::canvas::{Canvas, TextStyle, PT_TO_MM};
use crate::compose::Composer;
use crate::cursor::PageCursorState;
use crate::Result;
use log::debug;
use pdf_core::{Align, Color};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl From<CellAlign> for Align {
    fn from(align: CellAlign) -> Self {
        match align {
            CellAlign::Left => Align::Left,
            CellAlign::Center => Align::Center,
            CellAlign::Right => Align::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    /// Width in millimetres
    pub width: f64,
    #[serde(default)]
    pub align: CellAlign,
}

impl Column {
    pub fn new(label: &str, width: f64, align: CellAlign) -> Self {
        Self {
            label: label.to_string(),
            width,
            align,
        }
    }
}

/// A row of the summary block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl SummaryRow {
    pub fn blank(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    pub columns: Vec<Column>,
    pub row_height: f64,
    /// Data rows to reserve, filled or not
    pub data_row_count: usize,
    /// Cell text of the leading data rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub summary_rows: Vec<SummaryRow>,
    #[serde(default)]
    pub zebra: bool,
}

impl TableSpec {
    /// Total width of all columns
    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Height of the header, one data row and the summary block
    pub fn min_height(&self) -> f64 {
        self.row_height * (2 + self.summary_rows.len()) as f64
    }

    /// Number of data rows that fit between `anchor_y` and the summary block
    pub fn capacity(&self, anchor_y: f64, threshold: f64) -> usize {
        if self.row_height <= 0.0 {
            return 0;
        }
        let summary_height = self.row_height * self.summary_rows.len() as f64;
        let summary_limit = threshold - summary_height;
        let rows = ((summary_limit - (anchor_y + self.row_height)) / self.row_height).floor();
        if rows > 0.0 {
            rows as usize
        } else {
            0
        }
    }
}

/// Colors and stroke widths of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub header_fill: Color,
    pub header_text: Color,
    pub zebra_fill: Color,
    pub summary_fill: Color,
    pub rule_width: f64,
    pub border_width: f64,
    /// Horizontal cell padding
    pub padding: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            header_fill: Color::from_rgb(24, 54, 92),
            header_text: Color::white(),
            zebra_fill: Color::gray(0.95),
            summary_fill: Color::gray(0.9),
            rule_width: 0.2,
            border_width: 0.5,
            padding: 2.0,
        }
    }
}

impl TableStyle {
    pub fn with_font_size(self, font_size: f32) -> Self {
        Self { font_size, ..self }
    }
}

/// Text anchor of a cell for the given alignment
fn cell_anchor(left: f64, width: f64, align: CellAlign, padding: f64) -> f64 {
    match align {
        CellAlign::Left => left + padding,
        CellAlign::Center => left + width / 2.0,
        CellAlign::Right => left + width - padding,
    }
}

/// Draw a table at `anchor_y` and return the Y just below it
///
/// The data block holds `min(data_row_count, capacity)` rows so that the
/// summary block ends at or above the cursor's bottom threshold. The table
/// starts at the left margin. The canvas style is left unchanged.
///
/// # Arguments
/// * `canvas` - Surface to draw on (current page)
/// * `cursor` - Page geometry and bottom threshold
/// * `spec` - Columns, rows and summary block
/// * `anchor_y` - Top edge of the header band
/// * `style` - Colors and widths
pub fn draw_table<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &PageCursorState,
    spec: &TableSpec,
    anchor_y: f64,
    style: &TableStyle,
) -> Result<f64> {
    let saved = canvas.style();
    let left = cursor.margins.left;
    let width = spec.width();
    let rh = spec.row_height;

    let regular = TextStyle::regular(style.font_size);
    let bold = TextStyle::bold(style.font_size);
    // vertically centred baseline offset within a row
    let text_offset = (rh + style.font_size as f64 * PT_TO_MM * 0.7) / 2.0;

    let column_lefts: Vec<f64> = spec
        .columns
        .iter()
        .scan(left, |x, column| {
            let start = *x;
            *x += column.width;
            Some(start)
        })
        .collect();

    // Header
    canvas.fill_rect(left, anchor_y, width, rh, style.header_fill)?;
    canvas.set_style(bold.with_color(style.header_text));
    for (column, &x) in spec.columns.iter().zip(&column_lefts) {
        let anchor = cell_anchor(x, column.width, column.align, style.padding);
        canvas.draw_text(&column.label, anchor, anchor_y + text_offset, column.align.into())?;
    }

    // Data block
    let capacity = spec.capacity(anchor_y, cursor.margin_bottom_threshold);
    let rows = spec.data_row_count.min(capacity);
    if rows < spec.data_row_count {
        debug!(
            "Table clipped to {rows} of {} data rows",
            spec.data_row_count
        );
    }
    let data_top = anchor_y + rh;
    let data_bottom = data_top + rows as f64 * rh;

    if spec.zebra {
        for row in (1..rows).step_by(2) {
            canvas.fill_rect(left, data_top + row as f64 * rh, width, rh, style.zebra_fill)?;
        }
    }

    for row in 0..=rows {
        let y = data_top + row as f64 * rh;
        canvas.draw_line(left, y, left + width, y, style.rule_width)?;
    }

    if rows > 0 {
        for &x in column_lefts.iter().skip(1) {
            canvas.draw_line(x, data_top, x, data_bottom, style.rule_width)?;
        }
    }

    canvas.set_style(regular);
    for (row, cells) in spec.rows.iter().take(rows).enumerate() {
        let baseline = data_top + row as f64 * rh + text_offset;
        for ((cell, column), &x) in cells.iter().zip(&spec.columns).zip(&column_lefts) {
            let anchor = cell_anchor(x, column.width, column.align, style.padding);
            canvas.draw_text(cell, anchor, baseline, column.align.into())?;
        }
    }

    // Summary block
    let label_index = spec.columns.len().saturating_sub(2);
    let value_index = spec.columns.len().saturating_sub(1);
    for (i, summary) in spec.summary_rows.iter().enumerate() {
        let top = data_bottom + i as f64 * rh;
        canvas.fill_rect(left, top, width, rh, style.summary_fill)?;
        if i > 0 {
            canvas.draw_line(left, top, left + width, top, style.rule_width)?;
        }

        let baseline = top + text_offset;
        if let (Some(column), Some(&x)) =
            (spec.columns.get(label_index), column_lefts.get(label_index))
        {
            canvas.set_style(bold);
            let anchor = x + column.width - style.padding;
            canvas.draw_text(&summary.label, anchor, baseline, Align::Right)?;
        }
        if let (Some(value), Some(column), Some(&x)) = (
            &summary.value,
            spec.columns.get(value_index),
            column_lefts.get(value_index),
        ) {
            canvas.set_style(regular);
            let anchor = x + column.width - style.padding;
            canvas.draw_text(value, anchor, baseline, Align::Right)?;
        }
    }

    let end_y = data_bottom + rh * spec.summary_rows.len() as f64;
    canvas.stroke_rect(left, anchor_y, width, end_y - anchor_y, style.border_width)?;

    canvas.set_style(saved);
    Ok(end_y)
}

impl<'a, C: Canvas> Composer<'a, C> {
    /// Draw a table at the cursor, starting a new page first when the
    /// header, one data row and the summary block do not fit
    pub async fn write_table(&mut self, spec: &TableSpec) -> Result<()> {
        self.ensure_space(spec.min_height()).await?;

        let style = TableStyle::default().with_font_size(self.config.typography.table_size);
        let end_y = draw_table(
            &mut *self.canvas,
            &self.cursor,
            spec,
            self.cursor.current_y,
            &style,
        )?;
        self.cursor.move_to(end_y);
        self.add_space(self.config.typography.paragraph_spacing);
        Ok(())
    }
}
