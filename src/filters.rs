//! Stream encoding filters. `/Filter` entries name a pipeline applied in the
//! order the *reader* must invoke it; the writer applies filters in the
//! reverse order so the innermost filter (closest to the raw bytes) runs
//! first. Grounded on spec.md §4.6's filter pipeline description; `FlateDecode`
//! reuses the teacher's `flate2` dependency (`writer.rs` already compresses
//! stream payloads with it), `ASCII85Decode`/`ASCIIHexDecode` are hand-rolled
//! since no crate in the retrieved pack implements either, and `DCTDecode` is
//! a pass-through per spec.md's image boundary (JPEG bytes arrive already
//! encoded from an external decoder).

use crate::error::{PdfError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    FlateDecode,
    Ascii85Decode,
    AsciiHexDecode,
    DctDecode,
}

impl Filter {
    pub fn name(self) -> &'static str {
        match self {
            Filter::FlateDecode => "FlateDecode",
            Filter::Ascii85Decode => "ASCII85Decode",
            Filter::AsciiHexDecode => "ASCIIHexDecode",
            Filter::DctDecode => "DCTDecode",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "FlateDecode" => Ok(Filter::FlateDecode),
            "ASCII85Decode" => Ok(Filter::Ascii85Decode),
            "ASCIIHexDecode" => Ok(Filter::AsciiHexDecode),
            "DCTDecode" => Ok(Filter::DctDecode),
            other => Err(PdfError::parse(format!("unknown stream filter '{}'", other), 0)),
        }
    }

    fn encode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Filter::FlateDecode => {
                let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
                enc.write_all(data)?;
                Ok(enc.finish()?)
            }
            Filter::Ascii85Decode => Ok(ascii85_encode(data)),
            Filter::AsciiHexDecode => Ok(ascii_hex_encode(data)),
            Filter::DctDecode => Ok(data.to_vec()),
        }
    }

    fn decode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Filter::FlateDecode => {
                let mut dec = ZlibDecoder::new(data);
                let mut out = Vec::new();
                dec.read_to_end(&mut out)?;
                Ok(out)
            }
            Filter::Ascii85Decode => ascii85_decode(data),
            Filter::AsciiHexDecode => ascii_hex_decode(data),
            Filter::DctDecode => Ok(data.to_vec()),
        }
    }
}

/// The document-default pipeline named in spec.md §4.6: `ASCII85Decode` then
/// `FlateDecode`, as the list a reader would apply left-to-right.
pub fn default_pipeline() -> Vec<Filter> {
    vec![Filter::Ascii85Decode, Filter::FlateDecode]
}

/// Encode raw bytes through a filter pipeline for writing: applied in
/// reverse order (innermost/last-listed filter encodes first).
pub fn encode_pipeline(pipeline: &[Filter], data: &[u8]) -> Result<Vec<u8>> {
    let mut out = data.to_vec();
    for filter in pipeline.iter().rev() {
        out = filter.encode(&out)?;
    }
    Ok(out)
}

/// Decode bytes through a filter pipeline for reading: applied in listed
/// order, the same order `/Filter` names them.
pub fn decode_pipeline(pipeline: &[Filter], data: &[u8]) -> Result<Vec<u8>> {
    let mut out = data.to_vec();
    for filter in pipeline {
        out = filter.decode(&out)?;
    }
    Ok(out)
}

const A85_BASE: u32 = 85;

fn ascii85_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 5 / 4 + 8);
    out.extend_from_slice(b"<~");
    for chunk in data.chunks(4) {
        if chunk.len() == 4 && chunk == [0, 0, 0, 0] {
            out.push(b'z');
            continue;
        }
        let mut buf = [0u8; 4];
        buf[..chunk.len()].copy_from_slice(chunk);
        let mut n = u32::from_be_bytes(buf);
        let mut digits = [0u8; 5];
        for i in (0..5).rev() {
            digits[i] = (n % A85_BASE) as u8;
            n /= A85_BASE;
        }
        let keep = chunk.len() + 1;
        for &d in &digits[..keep] {
            out.push(d + b'!');
        }
    }
    out.extend_from_slice(b"~>");
    out
}

fn ascii85_decode(data: &[u8]) -> Result<Vec<u8>> {
    let trimmed = data
        .strip_prefix(b"<~")
        .unwrap_or(data);
    let trimmed = trimmed.strip_suffix(b"~>").unwrap_or(trimmed);
    let mut out = Vec::new();
    let mut group = [0u8; 5];
    let mut count = 0;
    for &b in trimmed {
        if b.is_ascii_whitespace() {
            continue;
        }
        if b == b'z' && count == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        if !(b'!'..=b'u').contains(&b) {
            return Err(PdfError::parse("invalid ASCII85 digit", 0));
        }
        group[count] = b - b'!';
        count += 1;
        if count == 5 {
            let mut n: u32 = 0;
            for &d in &group {
                n = n.wrapping_mul(A85_BASE).wrapping_add(d as u32);
            }
            out.extend_from_slice(&n.to_be_bytes());
            count = 0;
        }
    }
    if count > 0 {
        let pad = 5 - count;
        for slot in group.iter_mut().skip(count) {
            *slot = (A85_BASE - 1) as u8;
        }
        let mut n: u32 = 0;
        for &d in &group {
            n = n.wrapping_mul(A85_BASE).wrapping_add(d as u32);
        }
        let bytes = n.to_be_bytes();
        out.extend_from_slice(&bytes[..4 - pad]);
    }
    Ok(out)
}

fn ascii_hex_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2 + 1);
    for b in data {
        out.extend_from_slice(format!("{:02X}", b).as_bytes());
    }
    out.push(b'>');
    out
}

fn ascii_hex_decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut digits: Vec<u8> = data
        .iter()
        .copied()
        .take_while(|&b| b != b'>')
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        digits.push(b'0');
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let s = std::str::from_utf8(pair).map_err(|_| PdfError::parse("invalid hex digit", 0))?;
        out.push(u8::from_str_radix(s, 16).map_err(|_| PdfError::parse("invalid hex digit", 0))?);
    }
    Ok(out)
}
