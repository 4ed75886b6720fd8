use std::fmt;
use std::io;

/// Unified error type for every fallible operation in the crate.
///
/// Mirrors the five error kinds named by the format's public contract:
/// reading/writing the underlying byte stream (`Io`), constructing an
/// inconsistent document (`Build`), formatting a value that cannot be
/// represented (`Format`), parsing malformed bytes (`Parse`), and passing
/// a value that violates a type's own invariants (`Value`).
#[derive(Debug)]
pub enum PdfError {
    Io(String),
    Build(String),
    Format(String),
    /// A structural parse failure, tagged with the byte offset at which it
    /// was detected.
    Parse { message: String, offset: usize },
    Value(String),
}

impl PdfError {
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        PdfError::Parse {
            message: message.into(),
            offset,
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        PdfError::Build(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        PdfError::Format(message.into())
    }

    pub fn value(message: impl Into<String>) -> Self {
        PdfError::Value(message.into())
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::Io(msg) => write!(f, "I/O error: {}", msg),
            PdfError::Build(msg) => write!(f, "build error: {}", msg),
            PdfError::Format(msg) => write!(f, "format error: {}", msg),
            PdfError::Parse { message, offset } => {
                write!(f, "parse error at byte {}: {}", offset, message)
            }
            PdfError::Value(msg) => write!(f, "value error: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<io::Error> for PdfError {
    fn from(e: io::Error) -> Self {
        PdfError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_offset() {
        let e = PdfError::parse("bad hex digit", 42);
        match e {
            PdfError::Parse { offset, .. } => assert_eq!(offset, 42),
            _ => panic!("expected Parse"),
        }
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let e: PdfError = io_err.into();
        assert!(matches!(e, PdfError::Io(_)));
    }

    #[test]
    fn display_includes_offset() {
        let e = PdfError::parse("missing R", 7);
        assert!(e.to_string().contains('7'));
    }
}
