//! Pagination and page furniture, inspected through the recording canvas

mod common;

use chrono::NaiveDate;
use common::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tender::{
    wrap_lines, Canvas, Composer, DrawOp, FsAssetLoader, RecordingCanvas, TenderAssembler,
    TenderConfig, TextStyle,
};

const BODY: f32 = 10.0;

fn long_paragraph() -> String {
    "Cabinet carcasses are manufactured from moisture resistant board with edges \
     sealed on all sides before assembly and installation on site. "
        .repeat(8)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[tokio::test]
async fn test_paragraph_breaks_once_before_overflowing_line() {
    let config = TenderConfig::default();
    let text = long_paragraph();

    let mut measure = RecordingCanvas::a4();
    measure.set_style(TextStyle::regular(BODY));
    let expected = wrap_lines(|s| measure.text_width(s), &text, 170.0);
    assert!(expected.len() > 5);

    let mut canvas = RecordingCanvas::a4();
    let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);
    composer.new_page().await.unwrap();
    // 22mm left above the threshold: room for five body lines
    composer.add_space(200.0);
    composer.write_paragraph(&text, 170.0).await.unwrap();

    assert_eq!(canvas.page_count(), 2);

    let first = texts_in_style(&canvas, 1, BODY, false);
    let second = texts_in_style(&canvas, 2, BODY, false);
    assert_eq!(first.len(), 5);
    assert_eq!(first.len() + second.len(), expected.len());

    let drawn: Vec<String> = first.iter().chain(&second).map(|(t, _)| t.clone()).collect();
    assert_eq!(drawn, expected);

    for (_, baseline) in first.iter().chain(&second) {
        assert!(*baseline >= 40.0 && *baseline <= 262.0);
    }
    // continuation starts at the top margin
    assert!(second[0].1 < 45.0);
}

#[tokio::test]
async fn test_empty_paragraph_leaves_cursor() {
    let config = TenderConfig::default();
    let mut canvas = RecordingCanvas::a4();
    let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);
    composer.new_page().await.unwrap();
    let before = composer.cursor().current_y;

    composer.write_paragraph("  \n ", 170.0).await.unwrap();
    composer.write_bullet_list(&[], 170.0).await.unwrap();

    assert_eq!(composer.cursor().current_y, before);
    assert_eq!(texts_in_style(&canvas, 1, BODY, false), Vec::new());
}

#[tokio::test]
async fn test_bullet_item_moves_whole_to_next_page() {
    let config = TenderConfig::default();
    let long_item = long_paragraph();
    let items = vec!["Short item".to_string(), long_item];

    let mut canvas = RecordingCanvas::a4();
    let mut composer = Composer::new(&mut canvas, &config, &FsAssetLoader);
    composer.new_page().await.unwrap();
    composer.add_space(200.0);
    composer.write_bullet_list(&items, 170.0).await.unwrap();

    assert_eq!(canvas.page_count(), 2);

    let first = texts_in_style(&canvas, 1, BODY, false);
    let first: Vec<&str> = first.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(first, vec!["\u{2022}", "Short item"]);

    let second = texts_in_style(&canvas, 2, BODY, false);
    assert_eq!(second[0].0, "\u{2022}");
    assert!(second.len() > 6);

    // item text sits at the bullet indent
    let indented = canvas.page(2).iter().any(|op| {
        matches!(op, DrawOp::Text { x, style, .. } if *x == 25.0 && style.size_pt == BODY)
    });
    assert!(indented);
}

#[tokio::test]
async fn test_every_page_has_one_header_and_one_footer() {
    let assembler = TenderAssembler::new(
        TenderConfig::default(),
        Box::new(MemorySource::new().with("42", RIVERSIDE)),
    );
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    assert!(pages >= 6);
    assert_eq!(pages, canvas.page_count());
    for page in 1..=pages {
        assert_eq!(footer_rules(&canvas, page), 1, "footer on page {page}");
        assert_eq!(header_stamps(&canvas, page), 1, "header on page {page}");
    }
}

#[tokio::test]
async fn test_missing_logo_falls_back_on_every_page() {
    let config = TenderConfig {
        logo_path: Some(PathBuf::from("/nonexistent/logo.png")),
        ..TenderConfig::default()
    };
    let assembler = TenderAssembler::new(
        config,
        Box::new(MemorySource::new().with("42", RIVERSIDE)),
    );
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    for page in 1..=pages {
        assert!(canvas.page_contains(page, "HARBOURLINE"));
        assert!(canvas.page_contains(page, "Joinery & Interiors"));
        assert!(!canvas
            .page(page)
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. })));
    }
}

#[tokio::test]
async fn test_text_stays_inside_body_area() {
    let assembler = TenderAssembler::new(
        TenderConfig::default(),
        Box::new(MemorySource::new().with("42", RIVERSIDE)),
    );
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    for page in 1..=pages {
        for (text, baseline) in texts_in_style(&canvas, page, BODY, false) {
            assert!(
                (40.0..=262.0).contains(&baseline),
                "{text:?} at {baseline} on page {page}"
            );
        }
    }
}

#[tokio::test]
async fn test_oversized_pricing_table_is_clipped() {
    let mut config = TenderConfig::default();
    config.tables.pricing_rows = 100;

    let assembler =
        TenderAssembler::new(config, Box::new(MemorySource::new().with("42", RIVERSIDE)));
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    let pricing_page = (1..=pages)
        .find(|&page| canvas.page_contains(page, "Pricing Breakdown"))
        .unwrap();

    let borders: Vec<(f64, f64)> = canvas
        .page(pricing_page)
        .iter()
        .filter_map(|op| match op {
            DrawOp::StrokeRect { y, height, .. } => Some((*y, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(borders.len(), 1);
    let (top, height) = borders[0];
    assert!(top + height <= 262.0 + 1e-9);

    for label in ["Subtotal", "GST (15%)", "Total (incl. GST)"] {
        assert!(canvas.page_contains(pricing_page, label), "{label}");
    }
    // the table never continues on the next page
    assert!(!canvas.page_contains(pricing_page + 1, "Subtotal"));
}

#[tokio::test]
async fn test_terms_continue_on_further_pages() {
    let assembler = TenderAssembler::new(
        TenderConfig::default(),
        Box::new(MemorySource::new().with("42", RIVERSIDE)),
    );
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    let terms_start = (1..=pages)
        .find(|&page| canvas.page_contains(page, "Terms & Conditions"))
        .unwrap();
    let inclusions = (1..=pages)
        .find(|&page| canvas.page_contains(page, "General Inclusions"))
        .unwrap();

    assert!(inclusions > terms_start + 1);
    assert!(canvas.page_contains(inclusions - 1, "14. Disputes"));
}

#[tokio::test]
async fn test_long_field_value_stays_in_body() {
    let site = "Lot 12 Queen Street Riverside Industrial Estate ".repeat(200);
    let record = serde_json::json!({
        "id": 42,
        "projectName": "Riverside Kitchen",
        "siteLocation": site,
        "client": { "companyName": "Acme Ltd" }
    })
    .to_string();

    let assembler = TenderAssembler::new(
        TenderConfig::default(),
        Box::new(MemorySource::new().with("42", &record)),
    );
    let mut canvas = RecordingCanvas::a4();
    let pages = assembler
        .render_into(&mut canvas, "42", date())
        .await
        .unwrap();

    let overview = (1..=pages)
        .find(|&page| canvas.page_contains(page, "Project Overview"))
        .unwrap();
    // the value continues past the overview page
    assert!(canvas.page_contains(overview + 1, "Riverside Industrial Estate"));

    for page in 1..=pages {
        assert_eq!(footer_rules(&canvas, page), 1, "footer on page {page}");
        for bold in [false, true] {
            for (text, baseline) in texts_in_style(&canvas, page, BODY, bold) {
                assert!(
                    (40.0..=262.0).contains(&baseline),
                    "{text:?} at {baseline} on page {page}"
                );
            }
        }
    }
}
