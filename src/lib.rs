pub mod content;
pub mod document;
pub mod error;
pub mod file;
pub mod filters;
pub mod fonts;
pub mod image;
pub mod lexer;
pub mod object;
pub mod store;

pub use content::{Matrix, Operator};
pub use document::{Document, Page, PageHandle, PageLayout, UpdateHandle};
pub use error::{PdfError, Result};
pub use file::{Section, Version};
pub use filters::Filter;
pub use fonts::BuiltinFont;
pub use image::{ColorSpace, ImageEncoding, ImageXObject};
pub use object::{ObjId, Value};
pub use store::ObjectStore;
