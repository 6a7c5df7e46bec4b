//! Tender - multi-page tender submission composer
//!
//! This crate turns one project record into a paginated tender submission
//! PDF:
//! - Canvas abstraction over the PDF writer (plus a recording canvas)
//! - Asset loading for the company logo
//! - Page cursor, flow writer and table renderer that paginate themselves
//! - Page furniture (logo or wordmark, footer) stamped on every page
//! - Data-driven section generators and the document assembler
//!
//! # Example
//!
//! ```ignore
//! use tender::{HttpProjectSource, TenderAssembler, TenderConfig};
//!
//! let config = TenderConfig::from_json_file("tender.json")?;
//! let source = HttpProjectSource::new("https://admin.example.com/api");
//! let assembler = TenderAssembler::new(config, Box::new(source));
//! if let Some(artifact) = assembler.generate("42").await {
//!     std::fs::write(&artifact.file_name, &artifact.bytes)?;
//! }
//! ```

pub mod asset;
pub mod canvas;
mod compose;
pub mod config;
mod cover;
pub mod cursor;
pub mod flow;
pub mod furniture;
pub mod notify;
pub mod record;
pub mod sections;
pub mod table;

mod assembler;

pub use assembler::{
    output_file_name, sanitize_file_stem, tender_reference, TenderArtifact, TenderAssembler,
};
pub use asset::{AssetLoader, EmbeddableImage, FsAssetLoader};
pub use canvas::{Canvas, DrawOp, PdfCanvas, RecordingCanvas, TextStyle, MM_TO_PT, PT_TO_MM};
pub use compose::Composer;
pub use config::{
    CompanyProfile, FontConfig, Margins, PageConfig, TableConfig, TenderConfig, Typography,
};
pub use cursor::PageCursorState;
pub use flow::{wrap_lines, FlowUnit};
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier};
pub use pdf_core::{Align, Color};
pub use record::{ClientRef, DirProjectSource, HttpProjectSource, ProjectRecord, ProjectSource, RecordId};
pub use sections::{standard_sections, Section, SectionBlock};
pub use table::{draw_table, CellAlign, Column, SummaryRow, TableSpec, TableStyle};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a tender generation
#[derive(Debug, Error)]
pub enum TenderError {
    #[error("Project record not found: {0}")]
    RecordNotFound(String),

    #[error("Record source error: {0}")]
    Source(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for TenderError {
    fn from(err: reqwest::Error) -> Self {
        TenderError::Source(err.to_string())
    }
}

/// Errors loading a static asset such as the logo
///
/// These are recovered where the asset is used and never abort a document.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("Failed to read asset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode asset {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

/// Result type for tender operations
pub type Result<T> = std::result::Result<T, TenderError>;
