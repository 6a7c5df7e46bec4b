//! Page-aware composition over a canvas

use crate::asset::AssetLoader;
use crate::canvas::{Canvas, TextStyle};
use crate::config::TenderConfig;
use crate::cursor::PageCursorState;
use crate::furniture::stamp_page_furniture;
use crate::Result;
use log::debug;

/// Writes one document onto a canvas, starting pages as content requires
///
/// Every page is started through [`Composer::new_page`], which stamps the
/// page furniture before anything else is drawn on it.
pub struct Composer<'a, C: Canvas> {
    pub(crate) canvas: &'a mut C,
    pub(crate) cursor: PageCursorState,
    pub(crate) config: &'a TenderConfig,
    pub(crate) loader: &'a dyn AssetLoader,
}

impl<'a, C: Canvas> Composer<'a, C> {
    pub fn new(canvas: &'a mut C, config: &'a TenderConfig, loader: &'a dyn AssetLoader) -> Self {
        let (width, height) = canvas.page_size();
        Self {
            canvas,
            cursor: PageCursorState::new(width, height, config.page.margins),
            config,
            loader,
        }
    }

    pub fn cursor(&self) -> &PageCursorState {
        &self.cursor
    }

    pub fn canvas(&self) -> &C {
        &*self.canvas
    }

    pub fn config(&self) -> &TenderConfig {
        self.config
    }

    /// Start a page, reset the cursor and stamp the furniture
    pub async fn new_page(&mut self) -> Result<()> {
        let number = self.canvas.add_page()?;
        self.cursor.start_page();
        debug!("Started page {number}");
        stamp_page_furniture(&mut *self.canvas, &mut self.cursor, self.config, self.loader).await
    }

    /// Break the page unless `height` fits below the cursor
    ///
    /// A page that has nothing on it yet is never broken, so content taller
    /// than a page cannot loop. Returns whether a page was started.
    pub async fn ensure_space(&mut self, height: f64) -> Result<bool> {
        if self.cursor.page_number == 0 {
            self.new_page().await?;
            return Ok(true);
        }
        if self.cursor.fits(height) || self.at_page_top() {
            return Ok(false);
        }
        self.new_page().await?;
        Ok(true)
    }

    /// Move down by `dy`, stopping at the bottom threshold
    pub fn add_space(&mut self, dy: f64) {
        let dy = dy.min(self.cursor.remaining());
        self.cursor.advance(dy);
    }

    pub(crate) fn at_page_top(&self) -> bool {
        self.cursor.current_y <= self.cursor.margins.top
    }

    pub(crate) fn line_height(&self, style: &TextStyle) -> f64 {
        style.line_height(self.config.typography.line_height_factor)
    }

    pub(crate) fn body_style(&self) -> TextStyle {
        TextStyle::regular(self.config.typography.body_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FsAssetLoader;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_new_page_stamps_and_resets() {
        let config = TenderConfig::default();
        let mut canvas = RecordingCanvas::a4();
        let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);

        composer.new_page().await.unwrap();
        composer.cursor.advance(100.0);
        composer.new_page().await.unwrap();

        assert_eq!(composer.cursor().current_y, 40.0);
        assert_eq!(composer.cursor().page_number, 2);
        assert_eq!(canvas.page_count(), 2);
        assert!(canvas.page_contains(2, "HARBOURLINE"));
        assert!(canvas
            .page(2)
            .iter()
            .any(|op| matches!(op, DrawOp::Line { y1, .. } if *y1 == 272.0)));
    }

    #[tokio::test]
    async fn test_ensure_space() {
        let config = TenderConfig::default();
        let mut canvas = RecordingCanvas::a4();
        let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);

        // first write opens the first page
        assert!(composer.ensure_space(5.0).await.unwrap());
        // nothing on the page yet, so oversized content stays
        assert!(!composer.ensure_space(500.0).await.unwrap());

        composer.cursor.advance(200.0);
        assert!(!composer.ensure_space(22.0).await.unwrap());
        assert!(composer.ensure_space(22.5).await.unwrap());
        assert_eq!(composer.cursor().page_number, 2);
    }

    #[tokio::test]
    async fn test_add_space_stops_at_threshold() {
        let config = TenderConfig::default();
        let mut canvas = RecordingCanvas::a4();
        let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);
        composer.new_page().await.unwrap();

        composer.add_space(1000.0);
        assert_eq!(composer.cursor().current_y, 262.0);
    }
}
