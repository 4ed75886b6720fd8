use pdfforge::content::format_content;
use pdfforge::{BuiltinFont, Document, PageLayout, Value, Version};

#[test]
fn create_empty_document() {
    let doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    let bytes = doc.to_bytes().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("%PDF-1.7"));
    assert!(output.contains("%%EOF"));
}

#[test]
fn set_info_appears_in_output() {
    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    doc.set_info(vec![
        ("Creator", Value::literal_string("rust-pdf")),
        ("Title", Value::literal_string("Test Doc")),
    ]);
    doc.add_page().unwrap();
    let bytes = doc.to_bytes().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("(rust-pdf)"));
    assert!(output.contains("(Test Doc)"));
}

#[test]
fn add_text_writes_the_show_and_font_operators() {
    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    let handle = doc.add_page().unwrap();
    doc.page(handle).add_text("Hello", BuiltinFont::Helvetica, 12.0, 20.0, 20.0).unwrap();
    let ops = doc.page(handle).decoded_content().unwrap();
    let content = format_content(&ops).unwrap();
    let text = String::from_utf8(content).unwrap();
    assert!(text.contains("(Hello) Tj"));
    assert!(text.contains("/F1 12 Tf"));
}

#[test]
fn second_page_gets_its_own_resources() {
    let mut doc = Document::new(Version::v1_7(), PageLayout::OneColumn);
    let first = doc.add_page().unwrap();
    let second = doc.add_page().unwrap();
    doc.page(first).add_text("Page 1", BuiltinFont::Helvetica, 12.0, 20.0, 20.0).unwrap();
    doc.page(second).add_text("Page 2", BuiltinFont::TimesRoman, 12.0, 20.0, 20.0).unwrap();

    let first_ops = doc.page(first).decoded_content().unwrap();
    let second_ops = doc.page(second).decoded_content().unwrap();
    let first_text = String::from_utf8(format_content(&first_ops).unwrap()).unwrap();
    let second_text = String::from_utf8(format_content(&second_ops).unwrap()).unwrap();
    assert!(first_text.contains("(Page 1) Tj"));
    assert!(second_text.contains("(Page 2) Tj"));
}

/// Coordinate formatting through the public API: integer-valued
/// coordinates appear without decimals, fractional values retain precision.
#[test]
fn coord_formatting_in_content_stream() {
    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    let handle = doc.add_page().unwrap();
    doc.page(handle).add_text("test", BuiltinFont::Helvetica, 12.0, 20.0, 612.0).unwrap();
    let ops = doc.page(handle).decoded_content().unwrap();
    let text = String::from_utf8(format_content(&ops).unwrap()).unwrap();
    assert!(text.contains("1 0 0 1 20 612 cm"));

    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    let handle = doc.add_page().unwrap();
    doc.page(handle).add_text("test", BuiltinFont::Helvetica, 12.0, 12.5, 0.0).unwrap();
    let ops = doc.page(handle).decoded_content().unwrap();
    let text = String::from_utf8(format_content(&ops).unwrap()).unwrap();
    assert!(text.contains("1 0 0 1 12.5 0 cm"));
}
