//! The eight PDF value kinds plus the indirect-reference pseudo-kind,
//! their deterministic byte encoding, and the recursive-descent decoder
//! that inverts it. Grounded on the teacher's `objects.rs` sum type and
//! `writer.rs` serialization, generalized to the full value-kind set the
//! original (`pdfalcon/types.py`) models as `PdfBoolean`/`PdfNull`/
//! `PdfInteger`/`PdfReal`/`PdfLiteralString`/`PdfHexString`/`PdfName`/
//! `PdfArray`/`PdfDict`/`PdfStream`/`PdfIndirectObjectRef`.

use crate::error::{PdfError, Result};
use crate::lexer::TokenReader;

/// Identifies an indirect object: `(object number, generation number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32, pub u16);

impl ObjId {
    pub fn new(num: u32, gen: u16) -> Self {
        ObjId(num, gen)
    }
}

/// A PDF value: one of the eight primitive kinds, or an indirect reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Stored without the leading `/`, already un-escaped.
    Name(String),
    /// Logical text. Encoded verbatim in parens when ASCII and paren-safe,
    /// otherwise as a UTF-16BE literal with a leading BOM (see `format_real`
    /// sibling `encode_literal_string` for the exact rule).
    LiteralString(String),
    /// Raw bytes, written as uppercase hex between `<` `>`.
    HexString(Vec<u8>),
    Array(Vec<Value>),
    /// Key/value pairs; insertion order is preserved for readable output.
    Dictionary(Vec<(String, Value)>),
    Stream {
        dict: Vec<(String, Value)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl Value {
    pub fn name(s: &str) -> Self {
        Value::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        Value::LiteralString(s.to_string())
    }

    pub fn hex_string(bytes: Vec<u8>) -> Self {
        Value::HexString(bytes)
    }

    pub fn reference(id: ObjId) -> Self {
        Value::Reference(id)
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items)
    }

    pub fn dict(entries: Vec<(&str, Value)>) -> Self {
        Value::Dictionary(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    pub fn stream(dict_entries: Vec<(&str, Value)>, data: Vec<u8>) -> Self {
        Value::Stream {
            dict: dict_entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            data,
        }
    }

    pub fn as_dict_entries(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Dictionary(entries) => Some(entries),
            Value::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict_entries()?.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjId> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<(&[(String, Value)], &[u8])> {
        match self {
            Value::Stream { dict, data } => Some((dict, data)),
            _ => None,
        }
    }

    /// Serialize to the deterministic byte encoding. This is the top-level
    /// entry point; a `Stream` value is only legal here, never nested
    /// inside an array or dictionary (PDF forbids embedding a stream as a
    /// value — it may only be an indirect object's direct content).
    pub fn format(&self) -> Result<Vec<u8>> {
        self.format_inner(true)
    }

    fn format_inner(&self, allow_stream: bool) -> Result<Vec<u8>> {
        match self {
            Value::Null => Ok(b"null".to_vec()),
            Value::Boolean(b) => Ok(if *b { b"true".to_vec() } else { b"false".to_vec() }),
            Value::Integer(n) => Ok(n.to_string().into_bytes()),
            Value::Real(f) => Ok(format_real(*f).into_bytes()),
            Value::Name(s) => Ok(format!("/{}", escape_name(s)).into_bytes()),
            Value::LiteralString(s) => Ok(encode_literal_string(s)),
            Value::HexString(bytes) => {
                let mut out = Vec::with_capacity(bytes.len() * 2 + 2);
                out.push(b'<');
                for b in bytes {
                    out.extend_from_slice(format!("{:02X}", b).as_bytes());
                }
                out.push(b'>');
                Ok(out)
            }
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(item.format_inner(false)?);
                }
                Ok(format_array(&parts))
            }
            Value::Dictionary(entries) => format_dict(entries),
            Value::Stream { dict, data } => {
                if !allow_stream {
                    return Err(PdfError::format("a stream cannot be nested inside another value"));
                }
                let mut entries: Vec<(String, Value)> =
                    dict.iter().filter(|(k, _)| k != "Length").cloned().collect();
                entries.push(("Length".to_string(), Value::Integer(data.len() as i64)));
                let mut out = format_dict(&entries)?;
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
                Ok(out)
            }
            Value::Reference(id) => Ok(format!("{} {} R", id.0, id.1).into_bytes()),
        }
    }
}

fn indent_two(body: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(body);
    let indented: Vec<String> = text.lines().map(|l| format!("  {}", l)).collect();
    indented.join("\n").into_bytes()
}

fn format_array(parts: &[Vec<u8>]) -> Vec<u8> {
    let multiline = parts.iter().any(|p| p.contains(&b'\n'));
    if !multiline {
        let mut out = vec![b'['];
        for (i, p) in parts.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(p);
        }
        out.push(b']');
        out
    } else {
        let mut body = Vec::new();
        for (i, p) in parts.iter().enumerate() {
            if i > 0 {
                body.push(b'\n');
            }
            body.extend_from_slice(p);
        }
        let mut out = b"[\n".to_vec();
        out.extend_from_slice(&indent_two(&body));
        out.extend_from_slice(b"\n]");
        out
    }
}

fn format_dict(entries: &[(String, Value)]) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Ok(b"<<\n>>".to_vec());
    }
    let mut body = Vec::new();
    for (i, (key, val)) in entries.iter().enumerate() {
        if i > 0 {
            body.push(b'\n');
        }
        body.extend_from_slice(format!("/{} ", escape_name(key)).as_bytes());
        body.extend_from_slice(&val.format_inner(false)?);
    }
    let mut out = b"<<\n".to_vec();
    out.extend_from_slice(&indent_two(&body));
    out.extend_from_slice(b"\n>>");
    Ok(out)
}

/// Format a float with the shortest decimal representation that round-trips,
/// always carrying an explicit `.` as the PDF number grammar allows no
/// exponent form.
pub fn format_real(f: f64) -> String {
    let s = format!("{}", f);
    if s.contains('.') || s.contains('e') || s.contains('E') {
        if s.contains('e') || s.contains('E') {
            // f64's shortest Display form can fall back to scientific
            // notation for very large/small magnitudes; PDF numbers never
            // use exponents, so expand explicitly.
            format!("{:.10}", f).trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    } else {
        format!("{}.0", s)
    }
}

/// Name bytes outside this set are escaped as `#HH` on write (PDF 1.7's
/// stricter rule, per spec.md's open question — see DESIGN.md).
fn name_byte_needs_escape(b: u8) -> bool {
    if !(0x21..=0x7E).contains(&b) {
        return true;
    }
    matches!(b, b'#' | b'%' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}')
}

pub fn escape_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if name_byte_needs_escape(b) {
            out.push_str(&format!("#{:02X}", b));
        } else {
            out.push(b as char);
        }
    }
    out
}

/// Reverse `#HH` escapes in a raw name token, producing the logical name.
pub fn unescape_name(raw: &[u8]) -> Result<String> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'#' {
            if i + 2 >= raw.len() {
                return Err(PdfError::parse("truncated #HH escape in name", i));
            }
            let hex = std::str::from_utf8(&raw[i + 1..i + 3])
                .map_err(|_| PdfError::parse("invalid #HH escape in name", i))?;
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| PdfError::parse("invalid hex digits in name escape", i))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| PdfError::parse("name is not valid UTF-8 after decoding", 0))
}

/// Whether `s` can be written verbatim as an ASCII literal string: every
/// byte is ASCII, non-control, and parens are balanced (so `(`/`)` never
/// need escaping beyond the grammar's own nesting).
fn is_plain_ascii_literal(s: &str) -> bool {
    if !s.is_ascii() {
        return false;
    }
    let mut depth = 0i32;
    for &b in s.as_bytes() {
        match b {
            0x00..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F => return false,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn encode_literal_string(s: &str) -> Vec<u8> {
    if is_plain_ascii_literal(s) {
        let mut out = Vec::with_capacity(s.len() + 2);
        out.push(b'(');
        for &b in s.as_bytes() {
            if b == b'\\' || b == b'(' || b == b')' {
                out.push(b'\\');
            }
            out.push(b);
        }
        out.push(b')');
        out
    } else {
        let mut out = vec![b'('];
        out.extend_from_slice(&[0xFE, 0xFF]);
        for unit in s.encode_utf16() {
            let bytes = unit.to_be_bytes();
            for &b in &bytes {
                if b == b'\\' || b == b'(' || b == b')' {
                    out.push(b'\\');
                }
                out.push(b);
            }
        }
        out.push(b')');
        out
    }
}

fn decode_literal_string(raw: &[u8]) -> String {
    if raw.len() >= 2 && raw[0] == 0xFE && raw[1] == 0xFF {
        let units: Vec<u16> = raw[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        raw.iter().map(|&b| b as char).collect()
    }
}

/// Decode a hex string's raw ASCII digits into bytes. An odd trailing
/// nibble is treated as zero-padded, per spec.md's hex-string rule.
pub fn decode_hex_string(digits: &[u8], offset: usize) -> Result<Vec<u8>> {
    let mut cleaned: Vec<u8> = digits.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        cleaned.push(b'0');
    }
    let mut out = Vec::with_capacity(cleaned.len() / 2);
    for pair in cleaned.chunks_exact(2) {
        let s = std::str::from_utf8(pair).map_err(|_| PdfError::parse("invalid hex digit", offset))?;
        let byte = u8::from_str_radix(s, 16).map_err(|_| PdfError::parse("invalid hex digit", offset))?;
        out.push(byte);
    }
    Ok(out)
}

/// Parse one PDF value starting at `pos`. Returns the value and the
/// position immediately after it. Mirrors the original's
/// `parse_pdf_object`: the first token selects the production, and a
/// dictionary escalates to a stream when immediately followed by the
/// `stream` keyword.
pub fn parse_value(data: &[u8], pos: usize) -> Result<(Value, usize)> {
    let mut reader = TokenReader::new(data, pos);
    let start_offset = reader.pos();
    let first = reader
        .next()
        .ok_or_else(|| PdfError::parse("unexpected end of input", start_offset))?;

    if first.is(b"<") {
        let mark = reader.pos();
        let second = reader.next();
        if second.as_ref().map(|t| t.is(b"<")).unwrap_or(false) {
            let (entries, after_dict) = parse_dict_entries(data, reader.pos())?;
            let mut probe = TokenReader::new(data, after_dict);
            let dict_end = probe.pos();
            let maybe_stream = probe.next();
            if maybe_stream.as_ref().map(|t| t.is(b"stream")).unwrap_or(false) {
                let stream_start = skip_stream_eol(data, probe.pos())?;
                let (data_bytes, after_stream) = read_stream_payload(data, stream_start, &entries)?;
                return Ok((
                    Value::Stream {
                        dict: entries,
                        data: data_bytes,
                    },
                    after_stream,
                ));
            }
            Ok((Value::Dictionary(entries), dict_end))
        } else {
            // hex string: collect until the closing '>'
            let mut hex = Vec::new();
            let mut cursor = mark;
            loop {
                let mut r = TokenReader::new(data, cursor);
                let t = r.next().ok_or_else(|| PdfError::parse("unterminated hex string", mark))?;
                cursor = r.pos();
                if t.is(b">") {
                    break;
                }
                hex.extend_from_slice(&t.bytes);
            }
            let bytes = decode_hex_string(&hex, mark)?;
            Ok((Value::HexString(bytes), cursor))
        }
    } else if first.is(b"[") {
        let mut items = Vec::new();
        let mut cursor = reader.pos();
        loop {
            let mut probe = TokenReader::new(data, cursor);
            let save = probe.pos();
            if let Some(t) = probe.next() {
                if t.is(b"]") {
                    cursor = probe.pos();
                    break;
                }
            }
            let _ = save;
            let (item, next) = parse_value(data, cursor)?;
            items.push(item);
            cursor = next;
        }
        Ok((Value::Array(items), cursor))
    } else if first.is(b"(") {
        let (text, after) = parse_literal_string_body(data, reader.pos())?;
        Ok((Value::LiteralString(text), after))
    } else if first.is(b"true") {
        Ok((Value::Boolean(true), reader.pos()))
    } else if first.is(b"false") {
        Ok((Value::Boolean(false), reader.pos()))
    } else if first.is(b"null") {
        Ok((Value::Null, reader.pos()))
    } else if first.is(b"/") {
        let name_start = reader.pos();
        let name_tok = reader
            .next()
            .ok_or_else(|| PdfError::parse("unexpected end of input after '/'", name_start))?;
        if name_tok.start != name_start {
            return Err(PdfError::parse("whitespace between '/' and name", name_start));
        }
        let name = unescape_name(&name_tok.bytes)?;
        Ok((Value::Name(name), reader.pos()))
    } else {
        parse_number_or_reference(data, &first, reader.pos())
    }
}

fn parse_number_or_reference(data: &[u8], first: &crate::lexer::Token, after_first: usize) -> Result<(Value, usize)> {
    let text = first
        .as_str()
        .ok_or_else(|| PdfError::parse("numeric token is not valid UTF-8", first.start))?;
    if let Ok(n) = text.parse::<i64>() {
        // Could be an indirect reference: "N G R".
        let mut probe = TokenReader::new(data, after_first);
        if let Some(gen_tok) = probe.next() {
            if let Some(gen_text) = gen_tok.as_str() {
                if let Ok(gen) = gen_text.parse::<u16>() {
                    let after_gen = probe.pos();
                    let mut probe2 = TokenReader::new(data, after_gen);
                    if let Some(r_tok) = probe2.next() {
                        if r_tok.is(b"R") {
                            return Ok((Value::Reference(ObjId::new(n as u32, gen)), probe2.pos()));
                        }
                    }
                }
            }
        }
        return Ok((Value::Integer(n), after_first));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Ok((Value::Real(f), after_first));
    }
    Err(PdfError::parse(format!("unrecognized token '{}'", text), first.start))
}

fn parse_literal_string_body(data: &[u8], start: usize) -> Result<(String, usize)> {
    let mut depth = 0i32;
    let mut raw = Vec::new();
    let mut i = start;
    loop {
        if i >= data.len() {
            return Err(PdfError::parse("unterminated literal string", start));
        }
        match data[i] {
            b'\\' => {
                if i + 1 >= data.len() {
                    return Err(PdfError::parse("unterminated escape in literal string", i));
                }
                let esc = data[i + 1];
                match esc {
                    b'n' => raw.push(b'\n'),
                    b'r' => raw.push(b'\r'),
                    b't' => raw.push(b'\t'),
                    b'b' => raw.push(0x08),
                    b'f' => raw.push(0x0C),
                    b'(' | b')' | b'\\' => raw.push(esc),
                    b'\n' => {}
                    b'\r' => {
                        if i + 2 < data.len() && data[i + 2] == b'\n' {
                            i += 1;
                        }
                    }
                    b'0'..=b'7' => {
                        let mut val = 0u32;
                        let mut n = 0;
                        let mut j = i + 1;
                        while n < 3 && j < data.len() && (b'0'..=b'7').contains(&data[j]) {
                            val = val * 8 + (data[j] - b'0') as u32;
                            j += 1;
                            n += 1;
                        }
                        raw.push((val & 0xFF) as u8);
                        i = j - 2; // compensate for the += 2 below
                    }
                    other => raw.push(other),
                }
                i += 2;
            }
            b'(' => {
                depth += 1;
                raw.push(b'(');
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    return Ok((decode_literal_string(&raw), i + 1));
                }
                depth -= 1;
                raw.push(b')');
                i += 1;
            }
            b => {
                raw.push(b);
                i += 1;
            }
        }
    }
}

fn parse_dict_entries(data: &[u8], pos: usize) -> Result<(Vec<(String, Value)>, usize)> {
    let mut entries = Vec::new();
    let mut cursor = pos;
    loop {
        let mut probe = TokenReader::new(data, cursor);
        let save = probe.pos();
        if let Some(t) = probe.next() {
            if t.is(b">") {
                let mut probe2 = TokenReader::new(data, probe.pos());
                let t2 = probe2
                    .next()
                    .ok_or_else(|| PdfError::parse("unterminated dictionary", save))?;
                if !t2.is(b">") {
                    return Err(PdfError::parse("expected '>>' to close dictionary", save));
                }
                return Ok((entries, probe2.pos()));
            }
        }
        let (key_val, after_key) = parse_value(data, cursor)?;
        let key = match key_val {
            Value::Name(n) => n,
            _ => return Err(PdfError::parse("dictionary key must be a name", cursor)),
        };
        let (val, after_val) = parse_value(data, after_key)?;
        entries.push((key, val));
        cursor = after_val;
    }
}

/// After the `stream` keyword, the spec requires exactly CRLF or LF (never
/// a bare CR) before the payload begins.
fn skip_stream_eol(data: &[u8], pos: usize) -> Result<usize> {
    if pos < data.len() && data[pos] == b'\r' && pos + 1 < data.len() && data[pos + 1] == b'\n' {
        Ok(pos + 2)
    } else if pos < data.len() && data[pos] == b'\n' {
        Ok(pos + 1)
    } else {
        Err(PdfError::parse("expected end-of-line after 'stream' keyword", pos))
    }
}

fn read_stream_payload(data: &[u8], start: usize, dict: &[(String, Value)]) -> Result<(Vec<u8>, usize)> {
    let length = dict
        .iter()
        .find(|(k, _)| k == "Length")
        .and_then(|(_, v)| v.as_integer())
        .ok_or_else(|| PdfError::parse("stream dictionary missing /Length", start))?;
    if length < 0 || start + length as usize > data.len() {
        return Err(PdfError::parse("stream /Length out of range", start));
    }
    let end = start + length as usize;
    let payload = data[start..end].to_vec();
    let mut reader = TokenReader::new(data, end);
    let endstream = reader
        .next()
        .ok_or_else(|| PdfError::parse("missing 'endstream' keyword", end))?;
    if !endstream.is(b"endstream") {
        return Err(PdfError::parse("expected 'endstream' keyword", end));
    }
    Ok((payload, reader.pos()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_id_equality() {
        assert_eq!(ObjId(1, 0), ObjId(1, 0));
        assert_ne!(ObjId(1, 0), ObjId(2, 0));
    }

    #[test]
    fn integer_round_trips() {
        let v = Value::Integer(-42);
        assert_eq!(v.format().unwrap(), b"-42");
    }

    #[test]
    fn real_always_has_a_point() {
        assert_eq!(format_real(3.0), "3.0");
        assert_eq!(format_real(3.5), "3.5");
    }

    #[test]
    fn name_escapes_special_bytes() {
        let escaped = escape_name("A#B");
        assert_eq!(escaped, "A#23B");
    }

    #[test]
    fn name_round_trips_through_unescape() {
        let escaped = escape_name("space char");
        let bytes = escaped.as_bytes();
        let restored = unescape_name(bytes).unwrap();
        assert_eq!(restored, "space char");
    }

    #[test]
    fn ascii_literal_string_is_written_verbatim() {
        let v = Value::literal_string("Hello");
        assert_eq!(v.format().unwrap(), b"(Hello)");
    }

    #[test]
    fn non_ascii_literal_string_uses_utf16_bom() {
        let v = Value::literal_string("café");
        let bytes = v.format().unwrap();
        assert!(bytes.starts_with(b"(\xFE\xFF"));
    }

    #[test]
    fn hex_string_formats_uppercase() {
        let v = Value::hex_string(b"JKL".to_vec());
        assert_eq!(v.format().unwrap(), b"<4A4B4C>");
    }

    #[test]
    fn hex_string_parses_odd_nibble_as_zero_padded() {
        let (v, _) = parse_value(b"<4A4B4>", 0).unwrap();
        match v {
            Value::HexString(bytes) => assert_eq!(bytes, vec![0x4A, 0x4B, 0x40]),
            _ => panic!("expected HexString"),
        }
    }

    #[test]
    fn hex_string_parses_full_bytes() {
        let (v, _) = parse_value(b"<4A4B4C>", 0).unwrap();
        match v {
            Value::HexString(bytes) => assert_eq!(bytes, b"JKL"),
            _ => panic!("expected HexString"),
        }
    }

    #[test]
    fn dict_round_trip() {
        let v = Value::dict(vec![("Type", Value::name("Catalog")), ("Pages", Value::reference(ObjId(2, 0)))]);
        let bytes = v.format().unwrap();
        let (parsed, _) = parse_value(&bytes, 0).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn array_round_trip() {
        let v = Value::array(vec![Value::Integer(1), Value::Integer(2), Value::Real(3.5)]);
        let bytes = v.format().unwrap();
        let (parsed, _) = parse_value(&bytes, 0).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn reference_round_trip() {
        let v = Value::reference(ObjId(5, 0));
        let bytes = v.format().unwrap();
        assert_eq!(bytes, b"5 0 R");
        let (parsed, _) = parse_value(&bytes, 0).unwrap();
        assert_eq!(parsed, v);
    }

    #[test]
    fn stream_round_trip_with_exact_length() {
        let v = Value::stream(vec![("Filter", Value::name("FlateDecode"))], b"hello world".to_vec());
        let bytes = v.format().unwrap();
        let (parsed, _) = parse_value(&bytes, 0).unwrap();
        match parsed {
            Value::Stream { data, dict } => {
                assert_eq!(data, b"hello world");
                assert!(dict.iter().any(|(k, v)| k == "Length" && v.as_integer() == Some(11)));
            }
            _ => panic!("expected Stream"),
        }
    }

    #[test]
    fn nested_dict_indents_two_spaces_per_level() {
        let v = Value::dict(vec![("Outer", Value::dict(vec![("Inner", Value::Integer(1))]))]);
        let text = String::from_utf8(v.format().unwrap()).unwrap();
        assert!(text.contains("  /Outer <<\n    /Inner 1\n  >>"));
    }

    #[test]
    fn stream_cannot_be_embedded_in_array() {
        let inner = Value::stream(vec![], vec![1, 2, 3]);
        let v = Value::array(vec![inner]);
        assert!(v.format().is_err());
    }
}
