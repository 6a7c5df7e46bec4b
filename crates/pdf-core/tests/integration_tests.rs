//! Integration tests for pdf-core
//!
//! These tests write real documents and reopen them with lopdf.

use lopdf::Document;
use pdf_core::{
    Align, Color, FontStyle, FontWeight, ImageScaleMode, ImageXObject, PdfDocument, PdfError, StrokeStyle,
    A4_HEIGHT_PT, A4_WIDTH_PT,
};
use pretty_assertions::assert_eq;

/// Create a small RGB PNG for testing
fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageBuffer, Rgb};

    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgb([20, 60, 120]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .expect("Failed to create PNG");
    buffer
}

fn reopen(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("Failed to reopen PDF")
}

fn page_text(doc: &Document, page: u32) -> String {
    let page_id = doc.get_pages()[&page];
    String::from_utf8_lossy(&doc.get_page_content(page_id).expect("page content")).into_owned()
}

#[test]
fn test_empty_document_roundtrip() {
    let mut doc = PdfDocument::new();
    let bytes = doc.to_bytes().expect("Failed to save PDF");
    assert_eq!(reopen(&bytes).get_pages().len(), 0);
}

#[test]
fn test_pages_roundtrip() {
    let mut doc = PdfDocument::new();
    for _ in 0..3 {
        doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT)
            .expect("Failed to add page");
    }
    assert_eq!(doc.page_count(), 3);

    let bytes = doc.to_bytes().expect("Failed to save PDF");
    assert_eq!(reopen(&bytes).get_pages().len(), 3);
}

#[test]
fn test_insert_text_uses_standard_font() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.set_font("helvetica", 12.0).unwrap();
    doc.insert_text("Hello", 1, 100.0, 100.0, Align::Left)
        .expect("Failed to insert text");

    let bytes = doc.to_bytes().unwrap();
    let pdf = reopen(&bytes);

    let content = page_text(&pdf, 1);
    assert!(content.contains("/F1 12 Tf"));
    assert!(content.contains("<48656C6C6F> Tj"));

    let page_id = pdf.get_pages()[&1];
    let fonts = pdf.get_page_fonts(page_id);
    let font = fonts.get(b"F1".as_slice()).expect("F1 resource");
    assert_eq!(
        font.get(b"BaseFont").unwrap().as_name().unwrap(),
        b"Helvetica"
    );
}

#[test]
fn test_bold_text_gets_its_own_font() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.insert_text("Regular", 1, 50.0, 50.0, Align::Left)
        .unwrap();
    doc.set_font_weight(FontWeight::Bold);
    doc.insert_text("Bold", 1, 50.0, 70.0, Align::Left).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = reopen(&bytes);
    let fonts = pdf.get_page_fonts(pdf.get_pages()[&1]);

    let mut base_fonts: Vec<Vec<u8>> = fonts
        .values()
        .map(|f| f.get(b"BaseFont").unwrap().as_name().unwrap().to_vec())
        .collect();
    base_fonts.sort();
    assert_eq!(
        base_fonts,
        vec![b"Helvetica".to_vec(), b"Helvetica-Bold".to_vec()]
    );
}

#[test]
fn test_italic_selects_oblique_variant() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.set_font_style(FontStyle::Italic);
    doc.set_font_weight(FontWeight::Bold);
    doc.insert_text("Note", 1, 50.0, 50.0, Align::Left).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = reopen(&bytes);
    let fonts = pdf.get_page_fonts(pdf.get_pages()[&1]);
    let font = fonts.values().next().expect("one font");
    assert_eq!(
        font.get(b"BaseFont").unwrap().as_name().unwrap(),
        b"Helvetica-BoldOblique"
    );
}

#[test]
fn test_text_on_multiple_pages() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();

    doc.insert_text("Page 1", 1, 100.0, 100.0, Align::Left)
        .unwrap();
    doc.insert_text("Page 2", 2, 100.0, 100.0, Align::Right)
        .unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = reopen(&bytes);
    assert!(page_text(&pdf, 1).contains("<506167652031> Tj"));
    assert!(page_text(&pdf, 2).contains("<506167652032> Tj"));
}

#[test]
fn test_empty_text_draws_nothing() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.insert_text("", 1, 100.0, 100.0, Align::Left)
        .expect("Failed to insert empty text");

    let bytes = doc.to_bytes().unwrap();
    assert!(!page_text(&reopen(&bytes), 1).contains("BT"));
}

#[test]
fn test_lines_and_rectangles() {
    let mut doc = PdfDocument::new();
    doc.add_page(200.0, 100.0).unwrap();

    let style = StrokeStyle::default();
    doc.draw_line(1, 10.0, 10.0, 190.0, 10.0, &style).unwrap();
    doc.fill_rect(1, 10.0, 20.0, 50.0, 10.0, Color::gray(0.9))
        .unwrap();
    doc.stroke_rect(1, 10.0, 20.0, 50.0, 10.0, &style).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let content = page_text(&reopen(&bytes), 1);
    assert!(content.contains("10 90 m"));
    assert!(content.contains("190 90 l"));
    assert!(content.contains("10 70 50 10 re\nf"));
    assert!(content.contains("10 70 50 10 re\nS"));
}

#[test]
fn test_insert_image_png() {
    let image = ImageXObject::decode(&create_test_png(40, 20)).unwrap();

    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.insert_image(&image, 1, 100.0, 50.0, 80.0, 80.0, ImageScaleMode::FitBox)
        .expect("Failed to insert PNG image");

    let bytes = doc.to_bytes().unwrap();
    let content = page_text(&reopen(&bytes), 1);
    // FitBox of 40x20 into 80x80 gives 80x40; bottom edge at 841.89 - 90
    assert!(content.contains("80 0 0 40 100"));
    assert!(content.contains("/Im1 Do"));
}

#[test]
fn test_image_shared_between_pages() {
    let image = ImageXObject::decode(&create_test_png(16, 16)).unwrap();

    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.insert_image(&image, 1, 0.0, 0.0, 50.0, 50.0, ImageScaleMode::Stretch)
        .unwrap();
    doc.insert_image(&image, 1, 60.0, 0.0, 50.0, 50.0, ImageScaleMode::Stretch)
        .unwrap();
    doc.insert_image(&image, 2, 0.0, 0.0, 50.0, 50.0, ImageScaleMode::Stretch)
        .unwrap();

    let bytes = doc.to_bytes().unwrap();
    let pdf = reopen(&bytes);

    let image_objects = pdf
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false)
        })
        .count();
    assert_eq!(image_objects, 1);
}

#[test]
fn test_invalid_page_number() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();

    let result = doc.insert_text("Test", 999, 100.0, 700.0, Align::Left);
    match result {
        Err(PdfError::InvalidPage(page, total)) => {
            assert_eq!(page, 999);
            assert_eq!(total, 1);
        }
        _ => panic!("Expected InvalidPage error"),
    }

    assert!(matches!(
        doc.fill_rect(0, 0.0, 0.0, 1.0, 1.0, Color::black()),
        Err(PdfError::InvalidPage(0, 1))
    ));
}

#[test]
fn test_unmappable_characters_are_replaced() {
    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.insert_text("a\u{0E2A}b", 1, 10.0, 10.0, Align::Left)
        .unwrap();

    let bytes = doc.to_bytes().unwrap();
    assert!(page_text(&reopen(&bytes), 1).contains("<613F62> Tj"));
}

#[test]
fn test_save_to_file() {
    let dir = std::env::temp_dir().join(format!("pdf-core-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("out.pdf");

    let mut doc = PdfDocument::new();
    doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT).unwrap();
    doc.save(&path).expect("Failed to save PDF");

    let pdf = Document::load(&path).expect("Failed to load saved PDF");
    assert_eq!(pdf.get_pages().len(), 1);
    std::fs::remove_dir_all(&dir).ok();
}
