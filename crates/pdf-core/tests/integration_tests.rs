//! Integration tests for pdf-core
//!
//! These tests verify end-to-end overlay stamping on real PDF structures.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_core::{Align, BuiltinFont, Overlay, PdfDocument, PdfError};
use pretty_assertions::assert_eq;

/// Create a minimal valid PDF with `page_count` Letter pages
///
/// Every page carries its own content stream reading "Page N". When
/// `inherit_resources` is set, the Resources dictionary lives on the Pages
/// node (behind a reference) instead of on each page.
fn create_test_pdf(page_count: usize, inherit_resources: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut base_font = Dictionary::new();
    base_font.set("Type", Object::Name(b"Font".to_vec()));
    base_font.set("Subtype", Object::Name(b"Type1".to_vec()));
    base_font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    let base_font_id = doc.add_object(Object::Dictionary(base_font));

    let mut font_dict = Dictionary::new();
    font_dict.set("F0", Object::Reference(base_font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(font_dict));
    let resources_id = doc.add_object(Object::Dictionary(resources.clone()));

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for n in 1..=page_count {
        // Deliberately leaves a non-black stroke colour behind
        let content = format!("1 0 0 RG\nBT\n/F0 12 Tf\n72 720 Td\n(Page {n}) Tj\nET\n");
        let contents_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        if !inherit_resources {
            page.set("Resources", Object::Dictionary(resources.clone()));
        }
        page.set("Contents", Object::Reference(contents_id));
        page_ids.push(doc.add_object(Object::Dictionary(page)));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set(
        "Kids",
        Object::Array(page_ids.into_iter().map(Object::Reference).collect()),
    );
    pages.set("Count", Object::Integer(page_count as i64));
    if inherit_resources {
        pages.set("Resources", Object::Reference(resources_id));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn sample_overlay() -> Overlay {
    let mut overlay = Overlay::letter();
    overlay.set_font(BuiltinFont::TimesBold, 12.0);
    overlay.draw_text("Acme (Pvt) Ltd", 73.0, 656.0, Align::Left);
    overlay.set_font(BuiltinFont::TimesRoman, 11.0);
    overlay.draw_text("07-03-2024", 467.0, 715.0, Align::Left);
    overlay.set_line_width(0.8);
    overlay.line(60.0, 510.0, 552.0, 510.0);
    overlay
}

/// Decoded content stream and font resource names of page one
fn first_page(bytes: &[u8]) -> (String, Vec<String>) {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).to_string();

    let mut fonts: Vec<String> = doc
        .get_page_fonts(page_id)
        .keys()
        .map(|name| String::from_utf8_lossy(name).to_string())
        .collect();
    fonts.sort();
    (content, fonts)
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = create_test_pdf(1, false);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_stamp_overlay_keeps_base_content() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf(1, false)).unwrap();
    doc.stamp_overlay(1, &sample_overlay()).unwrap();
    let bytes = doc.to_bytes().unwrap();

    let (content, fonts) = first_page(&bytes);
    assert!(content.starts_with("q\n"));
    assert!(content.contains("(Page 1) Tj"));
    assert!(content.contains("(Acme \\(Pvt\\) Ltd) Tj"));
    assert!(content.contains("(07-03-2024) Tj"));

    // Template content is isolated before the overlay starts
    let restore = content.find("\nQ\n").unwrap();
    let overlay_start = content.find("/BpTimesBold 12 Tf").unwrap();
    assert!(restore < overlay_start);

    assert_eq!(fonts, vec!["BpTimesBold", "BpTimesRoman", "F0"]);
}

#[test]
fn test_stamp_overlay_with_inherited_resources() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf(1, true)).unwrap();
    doc.stamp_overlay(1, &sample_overlay()).unwrap();
    let bytes = doc.to_bytes().unwrap();

    let (_, fonts) = first_page(&bytes);
    assert_eq!(fonts, vec!["BpTimesBold", "BpTimesRoman", "F0"]);
}

#[test]
fn test_retain_first_page() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf(3, false)).unwrap();
    assert_eq!(doc.page_count(), 3);

    doc.stamp_overlay(1, &sample_overlay()).unwrap();
    doc.retain_first_page().unwrap();
    assert_eq!(doc.page_count(), 1);

    let bytes = doc.to_bytes().unwrap();
    let (content, _) = first_page(&bytes);
    assert!(content.contains("(Page 1) Tj"));
    assert!(!content.contains("(Page 2) Tj"));
    assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
}

#[test]
fn test_empty_overlay_leaves_page_untouched() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf(1, false)).unwrap();
    doc.stamp_overlay(1, &Overlay::letter()).unwrap();
    let bytes = doc.to_bytes().unwrap();

    let (content, fonts) = first_page(&bytes);
    assert!(!content.starts_with("q\n"));
    assert_eq!(fonts, vec!["F0"]);
}

#[test]
fn test_invalid_page_number() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf(1, false)).unwrap();
    let result = doc.stamp_overlay(5, &sample_overlay());
    assert!(matches!(result, Err(PdfError::InvalidPage(5, 1))));
}

#[test]
fn test_open_from_file_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("template.pdf");
    std::fs::write(&path, create_test_pdf(2, false)).unwrap();

    let doc = PdfDocument::open(&path).unwrap();
    assert_eq!(doc.page_count(), 2);

    let missing = dir.path().join("missing.pdf");
    match PdfDocument::open(&missing) {
        Err(PdfError::TemplateNotFound(p)) => assert!(p.ends_with("missing.pdf")),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("expected missing template error"),
    }
}

#[test]
fn test_open_invalid_bytes() {
    let result = PdfDocument::open_from_bytes(b"not a pdf");
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_standalone_overlay_pdf() {
    let bytes = sample_overlay().to_pdf_bytes().unwrap();
    let (content, fonts) = first_page(&bytes);

    assert!(!content.starts_with("q\n"));
    assert!(content.contains("60 510 m\n552 510 l"));
    assert_eq!(fonts, vec!["BpTimesBold", "BpTimesRoman"]);
}
