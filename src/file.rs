//! File-level structure: header, cross-reference table, trailer, and the
//! byte-offset-interlocked serializer/parser that ties them together.
//! Grounded on the original's `FileHeader`/`FileCrossReferenceTable`/
//! `CRTSubsection`/`CrossReferenceEntry`/`FileTrailer` (`pdf.py`), adapted
//! from that class-per-section model into a pair of free functions that
//! operate directly on an `ObjectStore` and a `Section` log, since this
//! crate keeps the whole document (not a single open file handle) as the
//! unit of state.

use crate::error::{PdfError, Result};
use crate::lexer::{lines_reverse, TokenReader};
use crate::object::{parse_value, ObjId, Value};
use crate::store::{ObjectStore, XrefEntry};

/// A four-byte marker, each byte >= 128, written in the header's comment
/// line to signal binary content to naive line-based tools. The exact
/// bytes are arbitrary; these match the sequence long used by other PDF
/// writers in the wild.
const BINARY_MARKER: [u8; 4] = [0xE2, 0xE3, 0xCF, 0xD3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }

    pub fn v1_7() -> Self {
        Version::new(1, 7)
    }
}

/// One indirect object together with the value it carried when it was
/// written or read, tagged onto a file section.
pub struct Section {
    pub touched: Vec<(ObjId, Value)>,
    pub freed_numbers: Vec<u32>,
}

impl Section {
    pub fn new() -> Self {
        Section { touched: Vec::new(), freed_numbers: Vec::new() }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new()
    }
}

fn format_header(version: Version) -> Vec<u8> {
    let mut out = format!("%PDF-{}.{}\n", version.major, version.minor).into_bytes();
    out.push(b'%');
    out.extend_from_slice(&BINARY_MARKER);
    out.push(b'\n');
    out
}

fn parse_header(data: &[u8]) -> Result<(Version, usize)> {
    let (line, _start, next) = crate::lexer::lines_forward(data, 0)
        .next()
        .ok_or_else(|| PdfError::parse("empty file, expected '%PDF-' header", 0))?;
    let text = std::str::from_utf8(&line).map_err(|_| PdfError::parse("header line is not valid UTF-8", 0))?;
    let rest = text
        .strip_prefix("%PDF-")
        .ok_or_else(|| PdfError::parse("missing '%PDF-' header", 0))?;
    let mut parts = rest.splitn(2, '.');
    let major: u8 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PdfError::parse("malformed PDF version", 0))?;
    let minor: u8 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PdfError::parse("malformed PDF version", 0))?;
    // Skip the binary-marker comment line, if present.
    let after_header = if next < data.len() && data[next] == b'%' {
        crate::lexer::lines_forward(data, next).next().map(|(_, _, n)| n).unwrap_or(next)
    } else {
        next
    };
    Ok((Version::new(major, minor), after_header))
}

fn format_indirect_object(id: ObjId, value: &Value) -> Result<Vec<u8>> {
    let mut out = format!("{} {} obj\n", id.0, id.1).into_bytes();
    let body = value.format()?;
    let is_stream = matches!(value, Value::Stream { .. });
    if is_stream {
        out.extend_from_slice(&body);
    } else {
        // Indent line-by-line over the raw bytes: a `LiteralString` holding
        // non-ASCII text encodes to UTF-16BE (object.rs's `encode_literal_string`),
        // which is not valid UTF-8, so decoding `body` as a `String` here would
        // corrupt it via lossy replacement.
        let mut lines = body.split(|&b| b == b'\n').peekable();
        while let Some(line) = lines.next() {
            out.extend_from_slice(b"  ");
            out.extend_from_slice(line);
            if lines.peek().is_some() {
                out.push(b'\n');
            }
        }
    }
    out.extend_from_slice(b"\nendobj");
    Ok(out)
}

fn xref_entry_line(entry: &XrefEntry, generation_for_in_use: u16) -> String {
    match entry {
        XrefEntry::InUse { offset } => format!("{:010} {:05} n \n", offset, generation_for_in_use),
        XrefEntry::Free { next_free, generation } => format!("{:010} {:05} f \n", next_free, generation),
    }
}

fn format_xref(entries: &[(u32, XrefEntry, u16)]) -> Vec<u8> {
    let mut out = b"xref\n".to_vec();
    let mut i = 0;
    while i < entries.len() {
        let first = entries[i].0;
        let mut j = i;
        while j + 1 < entries.len() && entries[j + 1].0 == entries[j].0 + 1 {
            j += 1;
        }
        let count = j - i + 1;
        out.extend_from_slice(format!("{} {}\n", first, count).as_bytes());
        for (_, entry, gen) in &entries[i..=j] {
            out.extend_from_slice(xref_entry_line(entry, *gen).as_bytes());
        }
        i = j + 1;
    }
    out
}

fn format_trailer(dict: &Value, startxref: u64) -> Result<Vec<u8>> {
    let mut out = b"trailer\n".to_vec();
    out.extend_from_slice(&dict.format()?);
    out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF", startxref).as_bytes());
    Ok(out)
}

/// Serialize every section of the document in order, producing the
/// complete byte stream per spec.md's §4.4 algorithm.
pub fn write_document(
    version: Version,
    store: &ObjectStore,
    sections: &[Section],
    trailer_extra: impl Fn(&Section) -> Vec<(String, Value)>,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let push_unit = |out: &mut Vec<u8>, bytes: &[u8]| {
        out.extend_from_slice(bytes);
        out.extend_from_slice(b"\n\n");
    };

    push_unit(&mut out, &format_header(version));

    let mut prev_offset: Option<u64> = None;
    for (section_index, section) in sections.iter().enumerate() {
        let mut xref_entries: Vec<(u32, XrefEntry, u16)> = Vec::new();

        if section_index == 0 {
            let head_next = store_free_next_of(store, 0);
            xref_entries.push((0, XrefEntry::Free { next_free: head_next, generation: 65535 }, 65535));
        }

        let mut touched: Vec<&(ObjId, Value)> = section.touched.iter().collect();
        touched.sort_by_key(|(id, _)| (id.0, id.1));
        for (id, value) in touched {
            let offset = out.len() as u64;
            push_unit(&mut out, &format_indirect_object(*id, value)?);
            xref_entries.push((id.0, XrefEntry::InUse { offset }, id.1));
        }

        for &number in &section.freed_numbers {
            let (next_free, generation) = store_free_entry(store, number)?;
            xref_entries.push((number, XrefEntry::Free { next_free, generation }, generation));
        }

        xref_entries.sort_by_key(|(number, _, _)| *number);
        let startxref = out.len() as u64;
        push_unit(&mut out, &format_xref(&xref_entries));

        let mut trailer_fields = vec![
            ("Size".to_string(), Value::Integer(store.highest_object_number() as i64 + 1)),
        ];
        trailer_fields.extend(trailer_extra(section));
        if let Some(prev) = prev_offset {
            trailer_fields.push(("Prev".to_string(), Value::Integer(prev as i64)));
        }
        let trailer_dict = Value::Dictionary(trailer_fields);
        push_unit(&mut out, &format_trailer(&trailer_dict, startxref)?);

        prev_offset = Some(startxref);
    }

    // The file ends with `%%EOF` followed by exactly one newline, not the
    // double newline used as the inter-unit separator.
    if out.ends_with(b"\n\n") {
        out.truncate(out.len() - 2);
        out.push(b'\n');
    }
    Ok(out)
}

fn store_free_next_of(store: &ObjectStore, number: u32) -> u32 {
    store
        .entries()
        .into_iter()
        .find_map(|(n, e)| if n == number { if let XrefEntry::Free { next_free, .. } = e { Some(next_free) } else { None } } else { None })
        .unwrap_or(0)
}

fn store_free_entry(store: &ObjectStore, number: u32) -> Result<(u32, u16)> {
    store
        .entries()
        .into_iter()
        .find_map(|(n, e)| {
            if n == number {
                if let XrefEntry::Free { next_free, generation } = e {
                    Some((next_free, generation))
                } else {
                    None
                }
            } else {
                None
            }
        })
        .ok_or_else(|| PdfError::build(format!("object {} was logged as freed but isn't on the free list", number)))
}

/// A single resolved cross-reference entry read from the file, before
/// objects are fetched.
enum ParsedXrefEntry {
    InUse { generation: u16, offset: u64 },
    Free { next_free: u32, generation: u16 },
}

struct ParsedSection {
    trailer: Vec<(String, Value)>,
    entries: Vec<(u32, ParsedXrefEntry)>,
}

fn find_last_startxref(data: &[u8]) -> Result<u64> {
    let mut lines = lines_reverse(data, data.len());
    // `lines_reverse` yields lines newest-first, so the offset (which sits
    // directly *after* `startxref` in file order) is read one iteration
    // *before* the line that matches the keyword.
    let mut prev = lines.next().ok_or_else(|| PdfError::parse("no 'startxref' keyword found", data.len()))?.0;
    loop {
        let (line, _) = lines.next().ok_or_else(|| PdfError::parse("no 'startxref' keyword found", data.len()))?;
        if crate::lexer::trim(&line) == b"startxref" {
            let text = std::str::from_utf8(&prev).map_err(|_| PdfError::parse("startxref offset is not UTF-8", 0))?;
            return text.trim().parse::<u64>().map_err(|_| PdfError::parse("invalid startxref offset", 0));
        }
        prev = line;
    }
}

fn parse_xref_section(data: &[u8], offset: usize) -> Result<(ParsedSection, usize)> {
    let mut reader = TokenReader::new(data, offset);
    let kw = reader.next().ok_or_else(|| PdfError::parse("expected 'xref' keyword", offset))?;
    if !kw.is(b"xref") {
        return Err(PdfError::parse("expected 'xref' keyword", offset));
    }
    let mut entries = Vec::new();
    loop {
        let mut probe = TokenReader::new(data, reader.pos());
        let save = probe.pos();
        let first = probe.next().ok_or_else(|| PdfError::parse("unexpected end of xref table", save))?;
        if first.is(b"trailer") {
            reader.seek(save);
            break;
        }
        let first_num: u32 = first
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PdfError::parse("expected subsection header 'first count'", save))?;
        let count_tok = probe.next().ok_or_else(|| PdfError::parse("expected subsection count", probe.pos()))?;
        let count: u32 = count_tok
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| PdfError::parse("expected subsection count", probe.pos()))?;
        let mut cursor = probe.pos();
        // Skip to the start of the fixed-width entry block.
        while cursor < data.len() && (data[cursor] == b'\n' || data[cursor] == b'\r' || data[cursor] == b' ') {
            cursor += 1;
        }
        for i in 0..count {
            if cursor + 20 > data.len() {
                return Err(PdfError::parse("truncated xref entry", cursor));
            }
            let raw = &data[cursor..cursor + 20];
            let text = std::str::from_utf8(&raw[0..18]).map_err(|_| PdfError::parse("malformed xref entry", cursor))?;
            let offset_or_next: u64 = text[0..10].trim().parse().map_err(|_| PdfError::parse("malformed xref offset", cursor))?;
            let generation: u16 = text[11..16].trim().parse().map_err(|_| PdfError::parse("malformed xref generation", cursor))?;
            let kind = text.as_bytes()[17];
            let number = first_num + i;
            match kind {
                b'n' => entries.push((number, ParsedXrefEntry::InUse { generation, offset: offset_or_next })),
                b'f' => entries.push((number, ParsedXrefEntry::Free { next_free: offset_or_next as u32, generation })),
                _ => return Err(PdfError::parse("xref entry is neither 'n' nor 'f'", cursor)),
            }
            cursor += 20;
        }
        reader.seek(cursor);
    }

    let mut trailer_reader = TokenReader::new(data, reader.pos());
    let trailer_kw = trailer_reader.next().ok_or_else(|| PdfError::parse("expected 'trailer' keyword", reader.pos()))?;
    if !trailer_kw.is(b"trailer") {
        return Err(PdfError::parse("expected 'trailer' keyword", reader.pos()));
    }
    let (trailer_value, after_trailer) = parse_value(data, trailer_reader.pos())?;
    let trailer = trailer_value
        .as_dict_entries()
        .ok_or_else(|| PdfError::parse("trailer is not a dictionary", trailer_reader.pos()))?
        .to_vec();

    Ok((ParsedSection { trailer, entries }, after_trailer))
}

fn parse_indirect_object_at(data: &[u8], offset: usize) -> Result<(ObjId, Value)> {
    let (line, line_start, after_line) = crate::lexer::lines_forward(data, offset)
        .next()
        .ok_or_else(|| PdfError::parse("expected 'N G obj' header", offset))?;
    let _ = line_start;
    let text = std::str::from_utf8(&line).map_err(|_| PdfError::parse("object header is not valid UTF-8", offset))?;
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 || parts[2] != "obj" {
        return Err(PdfError::parse("expected 'N G obj' header", offset));
    }
    let number: u32 = parts[0].parse().map_err(|_| PdfError::parse("invalid object number", offset))?;
    let generation: u16 = parts[1].parse().map_err(|_| PdfError::parse("invalid generation number", offset))?;
    let (value, after_value) = parse_value(data, after_line)?;
    let mut reader = TokenReader::new(data, after_value);
    let endobj = reader.next().ok_or_else(|| PdfError::parse("expected 'endobj'", after_value))?;
    if !endobj.is(b"endobj") {
        return Err(PdfError::parse("expected 'endobj'", after_value));
    }
    Ok((ObjId::new(number, generation), value))
}

pub struct ReadResult {
    pub version: Version,
    pub store: ObjectStore,
    pub trailer: Vec<(String, Value)>,
}

/// Parse a complete PDF byte stream into an object store plus the newest
/// trailer's dictionary, per spec.md §4.4's parse algorithm: locate the
/// newest section via `startxref`, walk `/Prev` to collect older sections,
/// then resolve each object number to the value from the newest section
/// that mentions it.
pub fn read_document(data: &[u8]) -> Result<ReadResult> {
    let (version, _after_header) = parse_header(data)?;
    let first_offset = find_last_startxref(data)?;

    let mut sections = Vec::new();
    let mut cursor = Some(first_offset as usize);
    while let Some(offset) = cursor {
        let (section, _) = parse_xref_section(data, offset)?;
        let prev = section
            .trailer
            .iter()
            .find(|(k, _)| k == "Prev")
            .and_then(|(_, v)| v.as_integer())
            .map(|n| n as usize);
        sections.push(section);
        cursor = prev;
    }

    let mut store = ObjectStore::new();
    let mut resolved_numbers = std::collections::HashSet::new();
    let mut free_links: Vec<(u32, u32, u16)> = Vec::new();

    for section in &sections {
        for (number, entry) in &section.entries {
            if resolved_numbers.contains(number) {
                continue;
            }
            resolved_numbers.insert(*number);
            match entry {
                ParsedXrefEntry::InUse { generation, offset } => {
                    let (id, value) = parse_indirect_object_at(data, *offset as usize)?;
                    if id.0 != *number || id.1 != *generation {
                        return Err(PdfError::parse(
                            format!("xref entry for object {} does not match the object header at its offset", number),
                            *offset as usize,
                        ));
                    }
                    store.attach_with_id(id, value)?;
                }
                ParsedXrefEntry::Free { next_free, generation } => {
                    free_links.push((*number, *next_free, *generation));
                }
            }
        }
    }
    store.rebuild_free_list(free_links);

    let trailer = sections.first().map(|s| s.trailer.clone()).unwrap_or_default();
    Ok(ReadResult { version, store, trailer })
}
