use pdfforge::{BuiltinFont, Document, PageLayout, Version};

/// Helper: create a PDF with `n` blank pages and return the raw bytes.
fn make_pdf(n: usize) -> Vec<u8> {
    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    for _ in 0..n {
        doc.add_page().unwrap();
    }
    doc.to_bytes().unwrap()
}

fn page_count(bytes: &[u8]) -> i64 {
    let doc = Document::read(bytes).unwrap();
    let pages_root_id = doc.catalog().get("Pages").and_then(pdfforge::Value::as_reference).unwrap();
    doc.object(pages_root_id).unwrap().get("Count").and_then(pdfforge::Value::as_integer).unwrap()
}

#[test]
fn reads_a_document_with_no_pages() {
    let bytes = make_pdf(0);
    assert_eq!(page_count(&bytes), 0);
}

#[test]
fn reads_a_document_with_one_page() {
    let bytes = make_pdf(1);
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn reads_a_document_with_ten_pages() {
    let bytes = make_pdf(10);
    assert_eq!(page_count(&bytes), 10);
}

#[test]
fn read_recovers_the_file_version() {
    let bytes = make_pdf(1);
    let doc = Document::read(&bytes).unwrap();
    assert_eq!(doc.version, Version::v1_7());
}

#[test]
fn read_recovers_content_added_before_write() {
    let mut doc = Document::new(Version::v1_7(), PageLayout::SinglePage);
    let handle = doc.add_page().unwrap();
    doc.page(handle).add_text("Round trip", BuiltinFont::Helvetica, 12.0, 20.0, 20.0).unwrap();
    let bytes = doc.to_bytes().unwrap();

    let reloaded = Document::read(&bytes).unwrap();
    let pages_root_id = reloaded.catalog().get("Pages").and_then(pdfforge::Value::as_reference).unwrap();
    let kids = reloaded.object(pages_root_id).unwrap().get("Kids").and_then(pdfforge::Value::as_array).unwrap();
    assert_eq!(kids.len(), 1);
}

#[test]
fn empty_bytes_is_a_parse_error() {
    let result = Document::read(&[]);
    assert!(result.is_err());
}

#[test]
fn garbage_bytes_is_a_parse_error() {
    let result = Document::read(b"this is not a pdf at all");
    assert!(result.is_err());
}

#[test]
fn header_only_is_a_parse_error() {
    let result = Document::read(b"%PDF-1.7\n");
    assert!(result.is_err());
}
