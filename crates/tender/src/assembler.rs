//! Tender document assembly
//!
//! One call resolves a project record, composes the cover letter and the
//! standard sections, and serializes the document under a derived file
//! name.

use crate::asset::{AssetLoader, FsAssetLoader};
use crate::canvas::{Canvas, PdfCanvas};
use crate::compose::Composer;
use crate::config::TenderConfig;
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::record::{ProjectRecord, ProjectSource};
use crate::sections::standard_sections;
use crate::{Result, TenderError};
use chrono::NaiveDate;
use log::{debug, error, info};
use pdf_core::FontFamilyBuilder;

/// A generated document
#[derive(Debug, Clone)]
pub struct TenderArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Replace every character that is not an ASCII letter or digit with `_`
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `Tender_Submission_<sanitized project name>_<YYYY-MM-DD>.pdf`
pub fn output_file_name(project_name: &str, date: NaiveDate) -> String {
    format!(
        "Tender_Submission_{}_{}.pdf",
        sanitize_file_stem(project_name),
        date.format("%Y-%m-%d")
    )
}

/// Tender number quoted on the cover letter
pub fn tender_reference(project_id: &str) -> String {
    format!("TENDER-{project_id}")
}

/// Builds tender submissions from project records
pub struct TenderAssembler {
    config: TenderConfig,
    source: Box<dyn ProjectSource>,
    loader: Box<dyn AssetLoader>,
    notifier: Box<dyn Notifier>,
}

impl TenderAssembler {
    pub fn new(config: TenderConfig, source: Box<dyn ProjectSource>) -> Self {
        Self {
            config,
            source,
            loader: Box::new(FsAssetLoader),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_loader(mut self, loader: Box<dyn AssetLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &TenderConfig {
        &self.config
    }

    /// Generate the submission dated today
    ///
    /// Failures are reported through the notifier and the log and yield
    /// `None`; nothing is retried.
    pub async fn generate(&self, project_id: &str) -> Option<TenderArtifact> {
        self.generate_on(project_id, chrono::Local::now().date_naive())
            .await
    }

    /// Generate the submission with an explicit date
    pub async fn generate_on(&self, project_id: &str, date: NaiveDate) -> Option<TenderArtifact> {
        self.notifier.notify(&Notification::InProgress {
            project_id: project_id.to_string(),
        });

        match self.try_generate_on(project_id, date).await {
            Ok(artifact) => {
                self.notifier.notify(&Notification::Success {
                    project_id: project_id.to_string(),
                    file_name: artifact.file_name.clone(),
                });
                Some(artifact)
            }
            Err(e) => {
                error!("Tender submission for project {project_id} aborted: {e}");
                self.notifier.notify(&Notification::Error {
                    project_id: project_id.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    /// Generate the submission dated today, returning the failure
    pub async fn try_generate(&self, project_id: &str) -> Result<TenderArtifact> {
        self.try_generate_on(project_id, chrono::Local::now().date_naive())
            .await
    }

    pub async fn try_generate_on(
        &self,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<TenderArtifact> {
        let record = self.fetch(project_id).await?;

        let page = &self.config.page;
        let mut canvas = PdfCanvas::new(page.width, page.height);
        self.load_fonts(&mut canvas).await?;

        let page_count = self.compose(&mut canvas, &record, project_id, date).await?;
        let bytes = canvas.to_bytes()?;
        let file_name = output_file_name(record.project_name(), date);

        info!(
            "Generated {file_name} ({page_count} pages, {} bytes)",
            bytes.len()
        );
        Ok(TenderArtifact {
            file_name,
            bytes,
            page_count,
        })
    }

    /// Fetch a record and compose it onto any canvas
    ///
    /// Nothing is drawn when the record cannot be fetched.
    pub async fn render_into<C: Canvas>(
        &self,
        canvas: &mut C,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<usize> {
        let record = self.fetch(project_id).await?;
        self.compose(canvas, &record, project_id, date).await
    }

    /// Compose the cover letter and every section; returns the page count
    pub async fn compose<C: Canvas>(
        &self,
        canvas: &mut C,
        record: &ProjectRecord,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<usize> {
        let id = record
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| project_id.to_string());
        let reference = tender_reference(&id);

        let mut composer = Composer::new(&mut *canvas, &self.config, self.loader.as_ref());
        composer.write_cover_letter(record, &reference, date).await?;
        for section in standard_sections(record, &self.config) {
            composer.render_section(&section).await?;
        }

        Ok(canvas.page_count())
    }

    async fn fetch(&self, project_id: &str) -> Result<ProjectRecord> {
        debug!("Fetching project {project_id}");
        self.source
            .fetch(project_id)
            .await?
            .ok_or_else(|| TenderError::RecordNotFound(project_id.to_string()))
    }

    async fn load_fonts(&self, canvas: &mut PdfCanvas) -> Result<()> {
        let Some(fonts) = &self.config.fonts else {
            return Ok(());
        };

        let read = |path: std::path::PathBuf| async move {
            tokio::fs::read(&path).await.map_err(|e| {
                TenderError::Config(format!("Failed to read font {}: {e}", path.display()))
            })
        };

        let mut builder = FontFamilyBuilder::new().regular(read(fonts.regular.clone()).await?);
        if let Some(bold) = &fonts.bold {
            builder = builder.bold(read(bold.clone()).await?);
        }
        canvas.use_font_family(&fonts.family, builder)?;
        debug!("Using font family {}", fonts.family);
        Ok(())
    }
}
