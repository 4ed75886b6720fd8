use pdfforge::object::parse_value;
use pdfforge::{ObjId, Value};

#[test]
fn obj_id_equality() {
    let a = ObjId(1, 0);
    let b = ObjId(1, 0);
    let c = ObjId(2, 0);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn name_constructor() {
    let obj = Value::name("Type");
    match obj {
        Value::Name(s) => assert_eq!(s, "Type"),
        _ => panic!("expected Name"),
    }
}

#[test]
fn literal_string_constructor() {
    let obj = Value::literal_string("Hello");
    match obj {
        Value::LiteralString(s) => assert_eq!(s, "Hello"),
        _ => panic!("expected LiteralString"),
    }
}

#[test]
fn reference_constructor() {
    let obj = Value::reference(ObjId(5, 0));
    match obj {
        Value::Reference(id) => assert_eq!(id, ObjId(5, 0)),
        _ => panic!("expected Reference"),
    }
}

#[test]
fn dict_constructor() {
    let obj = Value::dict(vec![("Type", Value::name("Catalog")), ("Pages", Value::reference(ObjId(2, 0)))]);
    match obj {
        Value::Dictionary(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].0, "Type");
            assert_eq!(entries[1].0, "Pages");
        }
        _ => panic!("expected Dictionary"),
    }
}

#[test]
fn array_constructor() {
    let obj = Value::array(vec![Value::reference(ObjId(3, 0)), Value::reference(ObjId(6, 0))]);
    match obj {
        Value::Array(items) => assert_eq!(items.len(), 2),
        _ => panic!("expected Array"),
    }
}

#[test]
fn stream_constructor_round_trips_through_parse_value() {
    let data = b"BT /F1 12 Tf ET".to_vec();
    let obj = Value::stream(vec![("Filter", Value::name("FlateDecode"))], data.clone());
    let bytes = obj.format().unwrap();
    let (parsed, _) = parse_value(&bytes, 0).unwrap();
    match parsed {
        Value::Stream { dict, data: d } => {
            assert_eq!(d, data);
            assert!(dict.iter().any(|(k, v)| k == "Filter" && v.as_name() == Some("FlateDecode")));
        }
        _ => panic!("expected Stream"),
    }
}

#[test]
fn a_dictionary_round_trips_through_its_own_byte_encoding() {
    let obj = Value::dict(vec![("Type", Value::name("Catalog")), ("Pages", Value::reference(ObjId(2, 0)))]);
    let bytes = obj.format().unwrap();
    let (parsed, _) = parse_value(&bytes, 0).unwrap();
    assert_eq!(parsed, obj);
}
