//! Section table of a tender submission
//!
//! Sections are plain data rendered by [`Composer::render_section`]; the
//! standard submission is built by [`standard_sections`].

use crate::canvas::{Canvas, TextStyle};
use crate::compose::Composer;
use crate::config::TenderConfig;
use crate::flow::FlowUnit;
use crate::record::ProjectRecord;
use crate::table::{CellAlign, Column, SummaryRow, TableSpec};
use crate::Result;
use log::debug;
use pdf_core::Align;

/// Width of the label column of a field list
const FIELD_LABEL_WIDTH: f64 = 45.0;

/// A titled section starting on a fresh page
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<SectionBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBlock {
    /// Bold sub-heading kept with the following line
    Heading(String),
    Flow(FlowUnit),
    /// Italic paragraph, such as a price validity note
    Note(String),
    /// Label and value pairs, values wrapped beside the labels
    Fields(Vec<(String, String)>),
    Table(TableSpec),
    /// Vertical space in millimetres
    Spacer(f64),
}

impl<'a, C: Canvas> Composer<'a, C> {
    /// Render a section on a new page
    pub async fn render_section(&mut self, section: &Section) -> Result<()> {
        self.new_page().await?;
        debug!(
            "Rendering section '{}' from page {}",
            section.title, self.cursor.page_number
        );

        let title_size = self.config.typography.heading_size;
        self.write_heading(&section.title, title_size).await?;

        for block in &section.blocks {
            match block {
                SectionBlock::Heading(text) => {
                    let size = self.config.typography.body_size + 1.0;
                    self.write_heading(text, size).await?;
                }
                SectionBlock::Flow(unit) => self.write_flow(unit).await?,
                SectionBlock::Note(text) => {
                    let style = self.body_style().italic();
                    let left = self.cursor.margins.left;
                    let width = self.cursor.content_width();
                    self.write_text_block(text, left, width, style).await?;
                }
                SectionBlock::Fields(fields) => self.write_fields(fields).await?,
                SectionBlock::Table(spec) => self.write_table(spec).await?,
                SectionBlock::Spacer(height) => self.add_space(*height),
            }
        }
        Ok(())
    }

    /// Write label/value pairs as two columns
    ///
    /// A field moves to the next page as a whole unless it is taller than
    /// a page, in which case its value continues line by line.
    pub async fn write_fields(&mut self, fields: &[(String, String)]) -> Result<()> {
        let body = self.body_style();
        let label_style = TextStyle::bold(body.size_pt);
        let line_height = self.line_height(&body);
        let left = self.cursor.margins.left;
        let value_width = self.cursor.content_width() - FIELD_LABEL_WIDTH;

        for (label, value) in fields {
            let lines = self.wrap(value, value_width, body);
            let rows = lines.len().max(1);
            let field_height = rows as f64 * line_height;
            if field_height <= self.cursor.body_height() {
                self.ensure_space(field_height).await?;
            }

            for i in 0..rows {
                self.ensure_space(line_height).await?;
                let baseline = self.cursor.current_y + body.ascent();
                if i == 0 {
                    self.canvas.set_style(label_style);
                    self.canvas
                        .draw_text(label, left, baseline, Align::Left)?;
                }
                if let Some(line) = lines.get(i) {
                    self.canvas.set_style(body);
                    self.canvas
                        .draw_text(line, left + FIELD_LABEL_WIDTH, baseline, Align::Left)?;
                }
                self.cursor.advance(line_height);
            }
        }

        if !fields.is_empty() {
            self.add_space(self.config.typography.paragraph_spacing);
        }
        Ok(())
    }
}

fn paragraph(text: &str) -> SectionBlock {
    SectionBlock::Flow(FlowUnit::Paragraph(text.to_string()))
}

fn bullets(items: &[&str]) -> SectionBlock {
    SectionBlock::Flow(FlowUnit::Bullets(
        items.iter().map(|item| item.to_string()).collect(),
    ))
}

fn field(label: &str, value: &str) -> (String, String) {
    (label.to_string(), value.to_string())
}

/// The five sections that follow the cover letter, in order
///
/// Pricing and specification tables are blank templates to be completed
/// by hand; their rows are not bound to the record's rates or materials.
pub fn standard_sections(record: &ProjectRecord, config: &TenderConfig) -> Vec<Section> {
    vec![
        overview_section(record, config),
        pricing_section(config),
        terms_section(config),
        inclusions_section(),
        exclusions_section(),
    ]
}

fn overview_section(record: &ProjectRecord, config: &TenderConfig) -> Section {
    let tables = &config.tables;
    let specification = TableSpec {
        columns: vec![
            Column::new("Item", 45.0, CellAlign::Left),
            Column::new("Specification", 85.0, CellAlign::Left),
            Column::new("Finish / Colour", 40.0, CellAlign::Left),
        ],
        row_height: tables.row_height,
        data_row_count: tables.specification_items.len(),
        rows: tables
            .specification_items
            .iter()
            .map(|item| vec![item.clone()])
            .collect(),
        summary_rows: Vec::new(),
        zebra: tables.zebra,
    };

    Section {
        title: "Project Overview".to_string(),
        blocks: vec![
            SectionBlock::Fields(vec![
                field("Project:", record.project_name()),
                field("Site Address:", record.site_location()),
                field("Client:", record.client_name()),
                field("Submitted By:", &config.company.name),
            ]),
            paragraph(
                "This submission covers the manufacture, supply and installation of the \
                 joinery described below. Materials and finishes are listed in the \
                 specification schedule and are subject to final confirmation at the \
                 pre-start meeting.",
            ),
            SectionBlock::Heading("Specification Schedule".to_string()),
            SectionBlock::Table(specification),
        ],
    }
}

fn pricing_section(config: &TenderConfig) -> Section {
    let tables = &config.tables;
    let pricing = TableSpec {
        columns: vec![
            Column::new("No.", 12.0, CellAlign::Center),
            Column::new("Description", 78.0, CellAlign::Left),
            Column::new("Qty", 20.0, CellAlign::Right),
            Column::new("Unit", 20.0, CellAlign::Center),
            Column::new("Rate", 20.0, CellAlign::Right),
            Column::new("Amount", 20.0, CellAlign::Right),
        ],
        row_height: tables.row_height,
        data_row_count: tables.pricing_rows,
        rows: Vec::new(),
        summary_rows: vec![
            SummaryRow::blank("Subtotal"),
            SummaryRow::blank(&tables.gst_label),
            SummaryRow::blank("Total (incl. GST)"),
        ],
        zebra: tables.zebra,
    };

    Section {
        title: "Pricing Breakdown".to_string(),
        blocks: vec![
            paragraph(
                "All prices are in New Zealand dollars. Quantities are measured from the \
                 tender drawings and are provisional until site measure.",
            ),
            SectionBlock::Table(pricing),
            SectionBlock::Note(
                "This price is valid for 30 days from the date of this submission. \
                 Variations will be priced at the schedule rates above where applicable."
                    .to_string(),
            ),
        ],
    }
}

fn terms_section(config: &TenderConfig) -> Section {
    let company = &config.company.name;
    let clauses = [
        (
            "1. Acceptance",
            format!(
                "Acceptance of this tender is by written instruction or purchase order \
                 referencing the tender number. {company} reserves the right to review \
                 pricing if acceptance is received after the validity period."
            ),
        ),
        (
            "2. Deposit",
            "A deposit of 40% of the contract value is payable on acceptance and before \
             materials are ordered. Manufacture is scheduled on receipt of the deposit."
                .to_string(),
        ),
        (
            "3. Progress Payments",
            "Progress claims are issued at the end of each month for work completed and \
             materials delivered to site. Claims are payable by the 20th of the month \
             following the claim."
                .to_string(),
        ),
        (
            "4. Final Payment",
            "The balance is due within seven days of practical completion of the \
             joinery installation. Retentions are not accepted unless agreed in writing \
             before acceptance."
                .to_string(),
        ),
        (
            "5. Site Measure",
            "Final dimensions are confirmed by our site measure once walls are lined and \
             stopped. Changes arising from site conditions that differ from the drawings \
             are treated as variations."
                .to_string(),
        ),
        (
            "6. Variations",
            "Any change to the scope, materials or finishes must be confirmed in writing. \
             Variations are priced before the work proceeds and may affect the programme."
                .to_string(),
        ),
        (
            "7. Programme",
            "Lead times are estimated from the date of the signed shop drawings. Delays \
             caused by late site readiness, access restrictions or other trades are \
             outside our control and may extend the programme."
                .to_string(),
        ),
        (
            "8. Site Readiness",
            "The site must be clean, dry, lockable and free of other trades in the \
             installation areas. Power, lighting and a clear path for delivery must be \
             available on the agreed installation dates."
                .to_string(),
        ),
        (
            "9. Storage",
            "Where delivery is deferred at the client's request, storage and double \
             handling are charged at cost. Goods stored on site are at the client's risk."
                .to_string(),
        ),
        (
            "10. Ownership",
            format!(
                "Ownership of all goods remains with {company} until payment has been \
                 received in full. Risk passes to the client on delivery to site."
            ),
        ),
        (
            "11. Warranty",
            "Cabinetry is warranted against defects in materials and workmanship for \
             five years from practical completion. Hardware carries the manufacturer's \
             warranty. Damage from misuse, moisture or alterations by others is excluded."
                .to_string(),
        ),
        (
            "12. Defects",
            "Defects must be notified in writing within the warranty period. We will \
             inspect within ten working days and repair or replace at our option."
                .to_string(),
        ),
        (
            "13. Liability",
            "Our liability is limited to the contract value. We are not liable for \
             indirect or consequential loss, including loss of use or loss of profit."
                .to_string(),
        ),
        (
            "14. Disputes",
            "Disputes are first to be discussed in good faith between the parties. If \
             unresolved within twenty working days, either party may refer the matter to \
             mediation before taking any further action."
                .to_string(),
        ),
    ];

    let mut blocks = vec![paragraph(
        "The following terms form part of this tender and of any contract arising from it.",
    )];
    for (heading, text) in clauses {
        blocks.push(SectionBlock::Heading(heading.to_string()));
        blocks.push(SectionBlock::Flow(FlowUnit::Paragraph(text)));
    }

    Section {
        title: "Terms & Conditions".to_string(),
        blocks,
    }
}

fn inclusions_section() -> Section {
    Section {
        title: "General Inclusions".to_string(),
        blocks: vec![
            paragraph("Unless stated otherwise, the tender price includes:"),
            bullets(&[
                "Site measure and preparation of shop drawings for approval",
                "Manufacture of all cabinetry in our workshop to the approved drawings",
                "Supply of hardware listed in the specification schedule",
                "Delivery to site and unloading at ground floor level",
                "Installation by qualified joiners, including scribing to walls and ceilings",
                "Cut-outs for sinks, hobs and tapware supplied to site before installation",
                "Removal of our packaging and offcuts from site",
                "Final adjustment of doors and drawers at handover",
            ]),
        ],
    }
}

fn exclusions_section() -> Section {
    Section {
        title: "General Exclusions & Health and Safety".to_string(),
        blocks: vec![
            SectionBlock::Heading("Exclusions".to_string()),
            bullets(&[
                "Plumbing, electrical and gas connections",
                "Appliances, sinks and tapware unless listed in the specification schedule",
                "Demolition, removal of existing joinery and making good of surfaces",
                "Wall linings, stopping, painting and floor coverings",
                "Building consent fees and engineering",
                "After-hours work and work outside the areas shown on the drawings",
            ]),
            SectionBlock::Heading("Health and Safety".to_string()),
            paragraph(
                "We operate under a documented health and safety plan. Our installers hold \
                 current site safety passports and complete a task analysis before work \
                 begins. The main contractor is responsible for site inductions, \
                 scaffolding, edge protection and a safe means of access to the \
                 installation areas.",
            ),
            bullets(&[
                "Site-specific safety plan provided before installation",
                "Hazards are identified and controlled through a daily toolbox meeting",
                "Incidents and near misses are reported to the main contractor the same day",
            ]),
            SectionBlock::Spacer(4.0),
            paragraph(
                "We look forward to working with you on this project. Please contact us \
                 with any questions about this submission.",
            ),
        ],
    }
}
