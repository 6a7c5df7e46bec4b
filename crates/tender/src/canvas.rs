//! Drawing surface abstraction
//!
//! All coordinates are millimetres from the top-left corner of the page;
//! text is positioned by its baseline. Font sizes are points. Drawing
//! always targets the most recently added page.

use crate::asset::EmbeddableImage;
use crate::{Result, TenderError};
use pdf_core::{
    Align, Color, FontFamilyBuilder, FontStyle, FontWeight, ImageScaleMode, PdfDocument, PdfError,
    StandardFont, StrokeStyle, DEFAULT_FAMILY,
};

/// Points to millimetres
pub const PT_TO_MM: f64 = 25.4 / 72.0;
/// Millimetres to points
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Active text style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size_pt: f32) -> Self {
        Self {
            size_pt,
            bold: false,
            italic: false,
            color: Color::black(),
        }
    }

    pub fn bold(size_pt: f32) -> Self {
        Self {
            bold: true,
            ..Self::regular(size_pt)
        }
    }

    pub fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Line height in millimetres for the given factor
    pub fn line_height(&self, factor: f64) -> f64 {
        self.size_pt as f64 * PT_TO_MM * factor
    }

    /// Distance from the top of a line to its baseline, in millimetres
    pub fn ascent(&self) -> f64 {
        self.size_pt as f64 * PT_TO_MM
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::regular(10.0)
    }
}

/// A fixed-size drawing surface that grows page by page
pub trait Canvas {
    /// Page size as (width, height) in millimetres
    fn page_size(&self) -> (f64, f64);

    /// Append a blank page and make it current; returns its number (1-indexed)
    fn add_page(&mut self) -> Result<usize>;

    /// Number of pages added so far
    fn page_count(&self) -> usize;

    /// Set the style used by subsequent text and measurement
    fn set_style(&mut self, style: TextStyle);

    /// The active text style
    fn style(&self) -> TextStyle;

    /// Width of `text` in millimetres at the active style
    fn text_width(&self, text: &str) -> f64;

    /// Draw text with its baseline at `baseline_y`
    fn draw_text(&mut self, text: &str, x: f64, baseline_y: f64, align: Align) -> Result<()>;

    /// Draw a black line of the given width (millimetres)
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) -> Result<()>;

    /// Fill a rectangle whose top-left corner is at (x, y)
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()>;

    /// Stroke a rectangle outline whose top-left corner is at (x, y)
    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    ) -> Result<()>;

    /// Place an image inside the box at (x, y), preserving its aspect ratio
    fn draw_image(
        &mut self,
        image: &EmbeddableImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;
}

fn stroke(width_mm: f64) -> StrokeStyle {
    StrokeStyle {
        width: width_mm * MM_TO_PT,
        color: Color::black(),
    }
}

/// Canvas backed by a [`PdfDocument`]
pub struct PdfCanvas {
    doc: PdfDocument,
    family: String,
    page_width: f64,
    page_height: f64,
    style: TextStyle,
}

impl PdfCanvas {
    /// Create a canvas with pages of the given size in millimetres
    pub fn new(page_width: f64, page_height: f64) -> Self {
        let mut canvas = Self {
            doc: PdfDocument::new(),
            family: DEFAULT_FAMILY.to_string(),
            page_width,
            page_height,
            style: TextStyle::default(),
        };
        canvas.set_style(TextStyle::default());
        canvas
    }

    /// Register a TrueType family and use it for all further text
    pub fn use_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        self.doc.register_font_family(name, builder)?;
        self.doc.set_font(name, self.style.size_pt)?;
        self.family = name.to_string();
        self.set_style(self.style);
        Ok(())
    }

    /// Name of the font family in use
    pub fn font_family(&self) -> &str {
        &self.family
    }

    /// Serialize the document
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.doc
            .to_bytes()
            .map_err(|e| TenderError::Serialization(e.to_string()))
    }

    fn current_page(&self) -> Result<usize> {
        match self.doc.page_count() {
            0 => Err(PdfError::InvalidPage(0, 0).into()),
            n => Ok(n),
        }
    }
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    fn add_page(&mut self) -> Result<usize> {
        Ok(self
            .doc
            .add_page(self.page_width * MM_TO_PT, self.page_height * MM_TO_PT)?)
    }

    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.doc.set_font_size(style.size_pt);
        self.doc.set_font_weight(if style.bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        });
        self.doc.set_font_style(if style.italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        });
        self.doc.set_text_color(style.color);
    }

    fn style(&self) -> TextStyle {
        self.style
    }

    fn text_width(&self, text: &str) -> f64 {
        // The current family always exists, it is checked when selected
        self.doc.get_text_width(text).unwrap_or(0.0) * PT_TO_MM
    }

    fn draw_text(&mut self, text: &str, x: f64, baseline_y: f64, align: Align) -> Result<()> {
        let page = self.current_page()?;
        self.doc
            .insert_text(text, page, x * MM_TO_PT, baseline_y * MM_TO_PT, align)?;
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) -> Result<()> {
        let page = self.current_page()?;
        self.doc.draw_line(
            page,
            x1 * MM_TO_PT,
            y1 * MM_TO_PT,
            x2 * MM_TO_PT,
            y2 * MM_TO_PT,
            &stroke(width),
        )?;
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
        let page = self.current_page()?;
        self.doc.fill_rect(
            page,
            x * MM_TO_PT,
            y * MM_TO_PT,
            width * MM_TO_PT,
            height * MM_TO_PT,
            color,
        )?;
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    ) -> Result<()> {
        let page = self.current_page()?;
        self.doc.stroke_rect(
            page,
            x * MM_TO_PT,
            y * MM_TO_PT,
            width * MM_TO_PT,
            height * MM_TO_PT,
            &stroke(line_width),
        )?;
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &EmbeddableImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let page = self.current_page()?;
        self.doc.insert_image(
            image.xobject(),
            page,
            x * MM_TO_PT,
            y * MM_TO_PT,
            width * MM_TO_PT,
            height * MM_TO_PT,
            ImageScaleMode::FitBox,
        )?;
        Ok(())
    }
}

/// A draw call captured by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f64,
        y: f64,
        align: Align,
        style: TextStyle,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Canvas that records draw calls per page instead of producing a PDF
///
/// Text is measured with the base-14 Helvetica metrics, the same ones
/// [`PdfCanvas`] uses by default, so layouts match.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    page_width: f64,
    page_height: f64,
    pages: Vec<Vec<DrawOp>>,
    style: TextStyle,
}

impl RecordingCanvas {
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            pages: Vec::new(),
            style: TextStyle::default(),
        }
    }

    /// A4 portrait
    pub fn a4() -> Self {
        Self::new(210.0, 297.0)
    }

    /// Recorded operations of every page
    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    /// Recorded operations of one page (1-indexed); empty if out of range
    pub fn page(&self, page: usize) -> &[DrawOp] {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Text strings drawn on a page, in drawing order
    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.page(page)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any text drawn on the page contains `needle`
    pub fn page_contains(&self, page: usize, needle: &str) -> bool {
        self.texts(page).iter().any(|text| text.contains(needle))
    }

    fn record(&mut self, op: DrawOp) -> Result<()> {
        match self.pages.last_mut() {
            Some(page) => {
                page.push(op);
                Ok(())
            }
            None => Err(PdfError::InvalidPage(0, 0).into()),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    fn add_page(&mut self) -> Result<usize> {
        self.pages.push(Vec::new());
        Ok(self.pages.len())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    fn style(&self) -> TextStyle {
        self.style
    }

    fn text_width(&self, text: &str) -> f64 {
        let font = match (self.style.bold, self.style.italic) {
            (true, true) => StandardFont::HelveticaBoldOblique,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (false, false) => StandardFont::Helvetica,
        };
        font.text_width_points(text, self.style.size_pt) as f64 * PT_TO_MM
    }

    fn draw_text(&mut self, text: &str, x: f64, baseline_y: f64, align: Align) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let style = self.style;
        self.record(DrawOp::Text {
            text: text.to_string(),
            x,
            y: baseline_y,
            align,
            style,
        })
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) -> Result<()> {
        self.record(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        })
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
        self.record(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        })
    }

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    ) -> Result<()> {
        self.record(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            line_width,
        })
    }

    fn draw_image(
        &mut self,
        _image: &EmbeddableImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.record(DrawOp::Image {
            x,
            y,
            width,
            height,
        })
    }
}
