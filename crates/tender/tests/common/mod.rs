//! Helpers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use tender::{DrawOp, ProjectRecord, ProjectSource, RecordingCanvas};

/// Records held in memory, keyed by id
pub struct MemorySource {
    records: HashMap<String, ProjectRecord>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn with(mut self, id: &str, json: &str) -> Self {
        let record = serde_json::from_str(json).expect("valid record JSON");
        self.records.insert(id.to_string(), record);
        self
    }
}

#[async_trait]
impl ProjectSource for MemorySource {
    async fn fetch(&self, project_id: &str) -> tender::Result<Option<ProjectRecord>> {
        Ok(self.records.get(project_id).cloned())
    }
}

pub const RIVERSIDE: &str = r#"{
    "id": 42,
    "projectName": "Riverside Kitchen",
    "siteLocation": "12 Queen St",
    "client": { "companyName": "Acme Ltd" }
}"#;

pub const FOOTER_RULE_Y: f64 = 272.0;

/// Footer rules on a page
pub fn footer_rules(canvas: &RecordingCanvas, page: usize) -> usize {
    canvas
        .page(page)
        .iter()
        .filter(|op| {
            matches!(op, DrawOp::Line { y1, y2, .. }
                if *y1 == FOOTER_RULE_Y && *y2 == FOOTER_RULE_Y)
        })
        .count()
}

/// Logo images plus wordmark headings on a page
pub fn header_stamps(canvas: &RecordingCanvas, page: usize) -> usize {
    canvas
        .page(page)
        .iter()
        .filter(|op| match op {
            DrawOp::Image { .. } => true,
            DrawOp::Text { text, .. } => text == "HARBOURLINE",
            _ => false,
        })
        .count()
}

/// Text ops drawn in the given size and weight
pub fn texts_in_style(
    canvas: &RecordingCanvas,
    page: usize,
    size_pt: f32,
    bold: bool,
) -> Vec<(String, f64)> {
    canvas
        .page(page)
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, y, style, .. }
                if style.size_pt == size_pt && style.bold == bold =>
            {
                Some((text.clone(), *y))
            }
            _ => None,
        })
        .collect()
}

/// Uppercase hex of WinAnsi text as it appears in a content stream
pub fn hex(text: &str) -> String {
    text.bytes().map(|b| format!("{b:02X}")).collect()
}
