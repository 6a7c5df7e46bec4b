//! Tender configuration
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration producing an A4 document with the built-in Helvetica
//! family.

use crate::furniture::FOOTER_RULE_OFFSET;
use crate::{Result, TenderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TenderConfig {
    /// Page geometry
    pub page: PageConfig,
    /// Font sizes and spacing
    pub typography: Typography,
    /// Issuing company, printed in the page furniture and the sign-off
    pub company: CompanyProfile,
    /// Logo image (JPEG or PNG)
    pub logo_path: Option<PathBuf>,
    /// TrueType family to embed instead of Helvetica
    pub fonts: Option<FontConfig>,
    /// Table layout
    pub tables: TableConfig,
}

impl TenderConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TenderError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Check that the page leaves room for content
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        let m = &page.margins;

        if page.width <= 0.0 || page.height <= 0.0 {
            return Err(TenderError::Config(format!(
                "page size must be positive, got {} x {} mm",
                page.width, page.height
            )));
        }
        if m.top < 0.0 || m.bottom < 0.0 || m.left < 0.0 || m.right < 0.0 {
            return Err(TenderError::Config("margins must not be negative".into()));
        }
        if m.bottom < FOOTER_RULE_OFFSET {
            return Err(TenderError::Config(format!(
                "bottom margin of {} mm overlaps the footer, at least {FOOTER_RULE_OFFSET} mm needed",
                m.bottom
            )));
        }
        if m.left + m.right >= page.width || m.top + m.bottom >= page.height {
            return Err(TenderError::Config(
                "margins leave no room for content".into(),
            ));
        }

        let t = &self.typography;
        if [t.body_size, t.heading_size, t.title_size, t.table_size, t.small_size]
            .iter()
            .any(|size| *size <= 0.0)
        {
            return Err(TenderError::Config("font sizes must be positive".into()));
        }
        if t.line_height_factor <= 0.0 {
            return Err(TenderError::Config(
                "line height factor must be positive".into(),
            ));
        }

        if self.tables.row_height <= 0.0 {
            return Err(TenderError::Config("table row height must be positive".into()));
        }

        Ok(())
    }
}

/// Page geometry in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margins: Margins::default(),
        }
    }
}

/// Page margins in millimetres
///
/// The top margin leaves room for the logo, the bottom margin for the footer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40.0,
            bottom: 35.0,
            left: 20.0,
            right: 20.0,
        }
    }
}

/// Font sizes (points) and spacing (millimetres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub body_size: f32,
    pub heading_size: f32,
    pub title_size: f32,
    pub table_size: f32,
    /// Footer and wordmark subtitle
    pub small_size: f32,
    /// Line height as a multiple of the font size
    pub line_height_factor: f64,
    /// Space after a paragraph or list
    pub paragraph_spacing: f64,
    /// Indent of bullet item text
    pub bullet_indent: f64,
    /// Space between bullet items
    pub bullet_item_spacing: f64,
    pub bullet: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            body_size: 10.0,
            heading_size: 14.0,
            title_size: 20.0,
            table_size: 9.0,
            small_size: 8.0,
            line_height_factor: 1.15,
            paragraph_spacing: 3.0,
            bullet_indent: 5.0,
            bullet_item_spacing: 1.0,
            bullet: "\u{2022}".to_string(),
        }
    }
}

/// The issuing company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    /// First line of the text wordmark drawn when the logo is unavailable
    pub wordmark_primary: String,
    /// Second line of the text wordmark
    pub wordmark_secondary: String,
    pub signatory_name: String,
    pub signatory_title: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Harbourline Joinery Ltd".to_string(),
            address: "18 Wharf Road, Onehunga, Auckland 1061".to_string(),
            email: "tenders@harbourline.co.nz".to_string(),
            phone: "+64 9 555 0142".to_string(),
            fax: "+64 9 555 0143".to_string(),
            website: "www.harbourline.co.nz".to_string(),
            wordmark_primary: "HARBOURLINE".to_string(),
            wordmark_secondary: "Joinery & Interiors".to_string(),
            signatory_name: "Morgan Reid".to_string(),
            signatory_title: "Estimating Manager".to_string(),
        }
    }
}

/// TrueType family embedded instead of the built-in Helvetica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    #[serde(default = "default_family_name")]
    pub family: String,
    pub regular: PathBuf,
    #[serde(default)]
    pub bold: Option<PathBuf>,
}

fn default_family_name() -> String {
    "brand".to_string()
}

/// Table layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Row height in millimetres
    pub row_height: f64,
    /// Rows of the specification schedule
    pub specification_items: Vec<String>,
    /// Reserved rows of the pricing breakdown
    pub pricing_rows: usize,
    /// Label of the tax summary row
    pub gst_label: String,
    /// Alternate row shading
    pub zebra: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            row_height: 7.0,
            specification_items: [
                "Carcass",
                "Benchtop",
                "Doors & Drawer Fronts",
                "Handles",
                "Hinges & Runners",
                "Splashback",
                "Kickboards",
                "Sink & Tapware",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            pricing_rows: 20,
            gst_label: "GST (15%)".to_string(),
            zebra: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        let config = TenderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TenderConfig::default());
        assert_eq!(config.page.width, 210.0);
        assert_eq!(config.page.margins.top, 40.0);
        assert_eq!(config.tables.specification_items.len(), 8);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "page": { "margins": { "left": 25 } },
            "typography": { "bodySize": 11 },
            "company": { "name": "Acme Joinery" },
            "logoPath": "assets/logo.png",
            "fonts": { "regular": "fonts/Brand-Regular.ttf" }
        }"#;
        let config = TenderConfig::from_json_str(json).unwrap();

        assert_eq!(config.page.margins.left, 25.0);
        assert_eq!(config.page.margins.right, 20.0);
        assert_eq!(config.typography.body_size, 11.0);
        assert_eq!(config.typography.heading_size, 14.0);
        assert_eq!(config.company.name, "Acme Joinery");
        assert_eq!(config.company.phone, CompanyProfile::default().phone);
        assert_eq!(config.logo_path, Some(PathBuf::from("assets/logo.png")));

        let fonts = config.fonts.unwrap();
        assert_eq!(fonts.family, "brand");
        assert_eq!(fonts.bold, None);
    }

    #[test]
    fn test_rejects_margins_wider_than_page() {
        let json = r#"{ "page": { "width": 100, "margins": { "left": 60, "right": 50 } } }"#;
        assert!(matches!(
            TenderConfig::from_json_str(json),
            Err(TenderError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_bottom_margin_inside_footer() {
        let json = r#"{ "page": { "margins": { "bottom": 15 } } }"#;
        assert!(matches!(
            TenderConfig::from_json_str(json),
            Err(TenderError::Config(_))
        ));

        let json = r#"{ "page": { "margins": { "bottom": 25 } } }"#;
        assert!(TenderConfig::from_json_str(json).is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            TenderConfig::from_json_str("{ not json"),
            Err(TenderError::Config(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let result = TenderConfig::from_json_file("/nonexistent/tender.json");
        assert!(matches!(result, Err(TenderError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tender.json");
        std::fs::write(&path, r#"{ "tables": { "pricingRows": 12 } }"#).unwrap();

        let config = TenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.tables.pricing_rows, 12);
        assert_eq!(config.tables.gst_label, "GST (15%)");
    }
}
