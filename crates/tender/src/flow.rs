//! Wrapped text that paginates itself

use crate::canvas::{Canvas, TextStyle};
use crate::compose::Composer;
use crate::Result;
use pdf_core::Align;
use serde::{Deserialize, Serialize};

/// A block of running text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum FlowUnit {
    Paragraph(String),
    Bullets(Vec<String>),
}

/// Greedy word wrap by measured width
///
/// Words are separated by whitespace and never broken: a word wider than
/// `max_width` gets a line of its own. Newlines in `text` start new lines;
/// blank lines between them are kept. Empty or whitespace-only text yields
/// no lines.
///
/// # Arguments
/// * `measure` - Width of a string in the same unit as `max_width`
/// * `text` - Text to wrap
/// * `max_width` - Maximum line width
pub fn wrap_lines<F>(measure: F, text: &str, max_width: f64) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    // leading and trailing blank lines carry nothing
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading);

    lines
}

impl<'a, C: Canvas> Composer<'a, C> {
    /// Write a flow unit across the content width
    pub async fn write_flow(&mut self, unit: &FlowUnit) -> Result<()> {
        let width = self.cursor.content_width();
        match unit {
            FlowUnit::Paragraph(text) => self.write_paragraph(text, width).await,
            FlowUnit::Bullets(items) => self.write_bullet_list(items, width).await,
        }
    }

    /// Write a wrapped paragraph at the left margin
    ///
    /// A line that does not fit above the bottom threshold starts a new
    /// page first. Empty text draws nothing and leaves the cursor alone.
    pub async fn write_paragraph(&mut self, text: &str, max_width: f64) -> Result<()> {
        let style = self.body_style();
        let x = self.cursor.margins.left;
        self.write_text_block(text, x, max_width, style).await?;
        Ok(())
    }

    /// Write text wrapped at `max_width` in the given style
    ///
    /// Returns whether anything was drawn.
    pub(crate) async fn write_text_block(
        &mut self,
        text: &str,
        x: f64,
        max_width: f64,
        style: TextStyle,
    ) -> Result<bool> {
        let lines = self.wrap(text, max_width, style);
        if lines.is_empty() {
            return Ok(false);
        }

        let line_height = self.line_height(&style);
        for line in &lines {
            self.write_line(line, x, style, line_height).await?;
        }
        self.add_space(self.config.typography.paragraph_spacing);
        Ok(true)
    }

    /// Write a bulleted list at the left margin
    ///
    /// Each item is wrapped on its own next to the bullet glyph. An item
    /// that does not fit on the current page moves to the next one as a
    /// whole, unless it is taller than a page.
    pub async fn write_bullet_list(&mut self, items: &[String], max_width: f64) -> Result<()> {
        let typography = &self.config.typography;
        let indent = typography.bullet_indent;
        let item_spacing = typography.bullet_item_spacing;
        let list_spacing = typography.paragraph_spacing;
        let bullet = typography.bullet.clone();

        let style = self.body_style();
        let line_height = self.line_height(&style);
        let x = self.cursor.margins.left;
        let mut drawn = false;

        for item in items {
            let lines = self.wrap(item, max_width - indent, style);
            if lines.is_empty() {
                continue;
            }

            let item_height = lines.len() as f64 * line_height;
            if item_height <= self.cursor.body_height() {
                self.ensure_space(item_height).await?;
            }

            for (i, line) in lines.iter().enumerate() {
                self.ensure_space(line_height).await?;
                self.canvas.set_style(style);
                let baseline = self.cursor.current_y + style.ascent();
                if i == 0 {
                    self.canvas.draw_text(&bullet, x, baseline, Align::Left)?;
                }
                self.canvas
                    .draw_text(line, x + indent, baseline, Align::Left)?;
                self.cursor.advance(line_height);
            }
            self.add_space(item_spacing);
            drawn = true;
        }

        if drawn {
            self.add_space(list_spacing);
        }
        Ok(())
    }

    /// Write a bold heading kept on the same page as the line after it
    pub async fn write_heading(&mut self, text: &str, size_pt: f32) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let style = TextStyle::bold(size_pt);
        let line_height = self.line_height(&style);
        let next_line = self.line_height(&self.body_style());
        self.ensure_space(line_height + next_line).await?;

        self.write_line(text.trim(), self.cursor.margins.left, style, line_height)
            .await?;
        self.add_space(self.config.typography.paragraph_spacing / 2.0);
        Ok(())
    }

    async fn write_line(
        &mut self,
        line: &str,
        x: f64,
        style: TextStyle,
        line_height: f64,
    ) -> Result<()> {
        self.ensure_space(line_height).await?;
        // a page break stamps furniture in its own style
        self.canvas.set_style(style);
        let baseline = self.cursor.current_y + style.ascent();
        self.canvas.draw_text(line, x, baseline, Align::Left)?;
        self.cursor.advance(line_height);
        Ok(())
    }

    pub(crate) fn wrap(&mut self, text: &str, max_width: f64, style: TextStyle) -> Vec<String> {
        self.canvas.set_style(style);
        let canvas = &*self.canvas;
        wrap_lines(|s| canvas.text_width(s), text, max_width)
    }
}
