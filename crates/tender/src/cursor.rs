//! Vertical writing position across pages

use crate::asset::EmbeddableImage;
use crate::config::Margins;

/// Layout state of one generation call
///
/// `current_y` only moves down within a page and returns to the top margin
/// when a page starts.
#[derive(Debug, Clone)]
pub struct PageCursorState {
    pub current_y: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Margins,
    /// Lowest Y content may reach
    pub margin_bottom_threshold: f64,
    /// Logo decoded on an earlier page
    pub logo: Option<EmbeddableImage>,
    /// Number of the current page (0 before the first page)
    pub page_number: usize,
}

impl PageCursorState {
    pub fn new(page_width: f64, page_height: f64, margins: Margins) -> Self {
        Self {
            current_y: margins.top,
            page_width,
            page_height,
            margins,
            margin_bottom_threshold: page_height - margins.bottom,
            logo: None,
            page_number: 0,
        }
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Height between the top and bottom margins
    pub fn body_height(&self) -> f64 {
        self.margin_bottom_threshold - self.margins.top
    }

    /// Space left above the bottom threshold
    pub fn remaining(&self) -> f64 {
        (self.margin_bottom_threshold - self.current_y).max(0.0)
    }

    /// Whether `height` more millimetres fit on the current page
    pub fn fits(&self, height: f64) -> bool {
        self.current_y + height <= self.margin_bottom_threshold
    }

    pub fn advance(&mut self, dy: f64) {
        self.current_y += dy.max(0.0);
    }

    /// Move down to `y`; never moves up
    pub fn move_to(&mut self, y: f64) {
        if y > self.current_y {
            self.current_y = y;
        }
    }

    /// Return to the top margin
    pub fn reset(&mut self) {
        self.current_y = self.margins.top;
    }

    /// Record that a new page has started
    pub fn start_page(&mut self) {
        self.page_number += 1;
        self.reset();
    }
}
