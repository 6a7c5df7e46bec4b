//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Creating PDF documents page by page
//! - Base-14 Helvetica text and embedded TrueType fonts
//! - Inserting text at specific coordinates
//! - Drawing lines and rectangles
//! - Inserting images (JPEG, PNG)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PdfDocument, A4_HEIGHT_PT, A4_WIDTH_PT};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT)?;
//! doc.set_font("helvetica", 12.0)?;
//! doc.insert_text("Hello, World!", page, 72.0, 72.0, Align::Left)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, PdfDocument, A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_FAMILY};
pub use font::{
    variant_name, winansi_byte, FontData, FontFamily, FontFamilyBuilder, FontObjects, FontStyle,
    FontWeight, StandardFont,
};
pub use graphics::StrokeStyle;
pub use image::{calculate_scaled_dimensions, detect_format, ImageFormat, ImageScaleMode, ImageXObject};
pub use text::{aligned_x, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Invalid page size: {0} x {1} points")]
    InvalidPageSize(f64, f64),

    #[error("Image error: {0}")]
    ImageError(String),

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
