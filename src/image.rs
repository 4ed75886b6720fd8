//! Image XObjects. Grounded on spec.md §1's explicit boundary: pixel
//! decoding is an external collaborator's job; the core only wraps
//! already-decoded bytes plus a tag describing them in an XObject stream,
//! the same shape the teacher's (deleted) `images.rs` produced after its
//! own PNG/JPEG decode step, minus the decode step itself.

use crate::object::Value;

/// How the raw bytes in an `ImageXObject` are encoded, mirroring the
/// `/Filter` a reader must apply to get back to raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Already-decoded raw samples; the core applies `FlateDecode` on write.
    RawSamples,
    /// Bytes are already a complete JPEG stream; wrapped with `DCTDecode`.
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
}

impl ColorSpace {
    fn name(self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceCmyk => "DeviceCMYK",
        }
    }
}

/// Pre-decoded image bytes plus the tag needed to describe them as an
/// `/Image` XObject. The core never inspects `data`'s pixel content.
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
    pub encoding: ImageEncoding,
    pub data: Vec<u8>,
}

impl ImageXObject {
    pub fn new(width: u32, height: u32, color_space: ColorSpace, bits_per_component: u8, encoding: ImageEncoding, data: Vec<u8>) -> Self {
        ImageXObject { width, height, color_space, bits_per_component, encoding, data }
    }

    /// Build the stream value this XObject serializes to. The caller
    /// (`Document`) is responsible for attaching it and referencing it from
    /// a page's `/XObject` resource subdictionary.
    pub fn to_stream_value(&self) -> Value {
        let mut dict = vec![
            ("Type", Value::name("XObject")),
            ("Subtype", Value::name("Image")),
            ("Width", Value::Integer(self.width as i64)),
            ("Height", Value::Integer(self.height as i64)),
            ("ColorSpace", Value::name(self.color_space.name())),
            ("BitsPerComponent", Value::Integer(self.bits_per_component as i64)),
        ];
        if self.encoding == ImageEncoding::Jpeg {
            dict.push(("Filter", Value::name("DCTDecode")));
        }
        Value::stream(dict, self.data.clone())
    }
}
