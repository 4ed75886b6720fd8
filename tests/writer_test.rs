use pdfforge::file::{write_document, Section, Version};
use pdfforge::object::escape_name;
use pdfforge::store::ObjectStore;
use pdfforge::{ObjId, Value};

#[test]
fn header_bytes() {
    let mut store = ObjectStore::new();
    let catalog_id = store.attach(Value::name("Catalog"));
    let mut section = Section::new();
    section.touched.push((catalog_id, store.get(catalog_id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| {
        vec![("Root".to_string(), Value::reference(catalog_id))]
    })
    .unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.starts_with("%PDF-1.7\n"));
    assert_eq!(bytes[9], b'%');
    assert!(bytes[10] >= 128);
    assert!(bytes[11] >= 128);
}

#[test]
fn object_body_is_written_between_obj_and_endobj() {
    let mut store = ObjectStore::new();
    let id = store.attach(Value::name("Type"));
    let mut section = Section::new();
    section.touched.push((id, store.get(id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| vec![]).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains(&format!("{} {} obj", id.0, id.1)));
    assert!(output.contains("/Type"));
    assert!(output.contains("endobj"));
}

#[test]
fn dictionary_writes_each_entry_on_its_own_indented_line() {
    let mut store = ObjectStore::new();
    let dict = Value::dict(vec![("Type", Value::name("Catalog")), ("Pages", Value::reference(ObjId(2, 0)))]);
    let id = store.attach(dict);
    let mut section = Section::new();
    section.touched.push((id, store.get(id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| vec![]).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Type /Catalog"));
    assert!(output.contains("/Pages 2 0 R"));
    let type_line = output.lines().find(|l| l.trim_start() == "/Type /Catalog").unwrap();
    assert!(type_line.starts_with("  "));
}

#[test]
fn array_of_references_writes_single_line() {
    let mut store = ObjectStore::new();
    let arr = Value::array(vec![Value::reference(ObjId(3, 0)), Value::reference(ObjId(6, 0))]);
    let id = store.attach(arr);
    let mut section = Section::new();
    section.touched.push((id, store.get(id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| vec![]).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("[3 0 R 6 0 R]"));
}

#[test]
fn stream_carries_an_exact_length() {
    let mut store = ObjectStore::new();
    let data = b"BT /F1 12 Tf ET".to_vec();
    let stream = Value::stream(vec![], data);
    let id = store.attach(stream);
    let mut section = Section::new();
    section.touched.push((id, store.get(id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| vec![]).unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Length 15"));
    assert!(output.contains("stream\n"));
    assert!(output.contains("BT /F1 12 Tf ET"));
    assert!(output.contains("\nendstream"));
}

#[test]
fn literal_string_escapes_parens_and_backslashes() {
    let v = Value::literal_string("a(b)c\\d");
    let bytes = v.format().unwrap();
    assert_eq!(bytes, b"(a\\(b\\)c\\\\d)");
}

#[test]
fn xref_entry_is_twenty_bytes_wide() {
    let mut store = ObjectStore::new();
    let id = store.attach(Value::name("Catalog"));
    let mut section = Section::new();
    section.touched.push((id, store.get(id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], |_| vec![]).unwrap();
    let xref_pos = bytes.windows(5).position(|w| w == b"xref\n").unwrap();
    let header = b"xref\n0 2\n";
    let entries_start = xref_pos + header.len();
    let entries = &bytes[entries_start..];
    // Each entry is exactly 20 bytes: 10-digit field, space, 5-digit field,
    // space, one-letter kind, space, newline.
    assert_eq!(entries[17], b'f');
    assert_eq!(&entries[18..20], b" \n");
    assert_eq!(entries[37], b'n');
    assert_eq!(&entries[38..40], b" \n");
}

#[test]
fn trailer_has_required_keys() {
    let mut store = ObjectStore::new();
    let catalog_id = store.attach(Value::name("Catalog"));
    let info_id = store.attach(Value::dict(vec![("Creator", Value::literal_string("test"))]));
    let mut section = Section::new();
    section.touched.push((catalog_id, store.get(catalog_id).unwrap().clone()));
    section.touched.push((info_id, store.get(info_id).unwrap().clone()));

    let bytes = write_document(Version::v1_7(), &store, &[section], move |_| {
        vec![("Root".to_string(), Value::reference(catalog_id)), ("Info".to_string(), Value::reference(info_id))]
    })
    .unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Size 3"));
    assert!(output.contains(&format!("/Root {} 0 R", catalog_id.0)));
    assert!(output.contains(&format!("/Info {} 0 R", info_id.0)));
    assert!(output.contains("startxref"));
    assert!(output.ends_with("%%EOF\n"));
}

#[test]
fn real_value_formatting() {
    let cases: Vec<(f64, &str)> = vec![(612.0, "612.0"), (792.0, "792.0"), (0.0, "0.0"), (12.5, "12.5")];
    for (val, expected) in cases {
        let bytes = Value::Real(val).format().unwrap();
        let output = String::from_utf8_lossy(&bytes);
        assert_eq!(output, expected);
    }
}

#[test]
fn escape_name_escapes_special_bytes() {
    assert_eq!(escape_name("hello"), "hello");
    assert_eq!(escape_name("a#b"), "a#23b");
}
