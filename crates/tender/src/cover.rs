//! Cover letter on the first page

use crate::canvas::{Canvas, TextStyle};
use crate::compose::Composer;
use crate::record::ProjectRecord;
use crate::Result;
use chrono::NaiveDate;
use pdf_core::Align;

/// Space left for a handwritten signature
const SIGNATURE_SPACE: f64 = 15.0;

impl<'a, C: Canvas> Composer<'a, C> {
    /// Open the first page and write the cover letter on it
    pub async fn write_cover_letter(
        &mut self,
        record: &ProjectRecord,
        reference: &str,
        date: NaiveDate,
    ) -> Result<()> {
        self.new_page().await?;

        let config = self.config;
        let typography = &config.typography;
        let title = TextStyle::bold(typography.title_size);
        let body = self.body_style();
        let bold = TextStyle::bold(typography.body_size);
        let spacing = typography.paragraph_spacing;
        let left = self.cursor.margins.left;
        let right = self.cursor.page_width - self.cursor.margins.right;
        let width = self.cursor.content_width();
        let company = &config.company;

        self.write_text_block("TENDER SUBMISSION", left, width, title)
            .await?;
        self.add_space(spacing);

        // date and reference share a line
        let line_height = self.line_height(&body);
        self.ensure_space(line_height).await?;
        let baseline = self.cursor.current_y + body.ascent();
        self.canvas.set_style(body);
        self.canvas.draw_text(
            &date.format("%-d %B %Y").to_string(),
            left,
            baseline,
            Align::Left,
        )?;
        self.canvas.set_style(bold);
        self.canvas.draw_text(
            &format!("Tender Reference: {reference}"),
            right,
            baseline,
            Align::Right,
        )?;
        self.cursor.advance(line_height);
        self.add_space(spacing * 2.0);

        let addressee = format!("{}\n{}", record.client_name(), record.site_location());
        self.write_text_block(&addressee, left, width, body).await?;
        self.add_space(spacing);

        self.write_text_block("Dear Sir/Madam,", left, width, body)
            .await?;
        let subject = format!("Re: {} - {}", record.project_name(), record.site_location());
        self.write_text_block(&subject, left, width, bold).await?;

        let paragraphs = [
            format!(
                "Thank you for the opportunity to tender for the joinery package at {}. \
                 {} is pleased to submit the enclosed proposal for the manufacture, supply \
                 and installation of the works.",
                record.site_location(),
                company.name
            ),
            "The submission sets out the project overview and specification schedule, a \
             pricing breakdown, our terms and conditions, and the general inclusions and \
             exclusions that apply to the price. Please read these sections together."
                .to_string(),
            format!(
                "Please quote the tender reference {reference} in all correspondence. We \
                 would welcome the chance to discuss the proposal and can arrange a site \
                 visit at your convenience."
            ),
        ];
        for paragraph in &paragraphs {
            self.write_text_block(paragraph, left, width, body).await?;
        }

        self.write_text_block("Yours faithfully,", left, width, body)
            .await?;
        self.add_space(SIGNATURE_SPACE);

        let sign_off = format!(
            "{}\n{}\n{}",
            company.signatory_name, company.signatory_title, company.name
        );
        self.write_text_block(&sign_off, left, width, body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::asset::FsAssetLoader;
    use crate::canvas::RecordingCanvas;
    use crate::compose::Composer;
    use crate::config::TenderConfig;
    use crate::record::ProjectRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_cover_letter_fits_first_page() {
        let config = TenderConfig::default();
        let record: ProjectRecord = serde_json::from_str(
            r#"{ "id": 42, "projectName": "Riverside Kitchen", "siteLocation": "12 Queen St",
                 "client": { "companyName": "Acme Ltd" } }"#,
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        let mut canvas = RecordingCanvas::a4();
        let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);
        composer
            .write_cover_letter(&record, "TENDER-42", date)
            .await
            .unwrap();

        assert_eq!(canvas.pages().len(), 1);
        let texts = canvas.texts(1);
        assert!(texts.contains(&"TENDER SUBMISSION"));
        assert!(texts.contains(&"5 March 2024"));
        assert!(texts.contains(&"Tender Reference: TENDER-42"));
        assert!(texts.contains(&"Acme Ltd"));
        assert!(texts.contains(&"Re: Riverside Kitchen - 12 Queen St"));
        assert!(texts.contains(&"Morgan Reid"));
    }
}
