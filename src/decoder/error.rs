use thiserror::Error;

/// Fatal decoding error for a chart or catalog byte stream.
///
/// Every variant carries the byte position where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer ended while a value was still being read.
    #[error("Unexpected end of input at byte {position}: needed {needed} more byte(s)..!")]
    UnexpectedEof { position: usize, needed: usize },

    /// A fixed byte (magic, section start) did not have its expected value.
    #[error("Mismatched {what} at byte {position}: got 0x{actual:02x}, expected 0x{expected:02x}..!")]
    Mismatch {
        what: &'static str,
        position: usize,
        expected: u8,
        actual: u8,
    },

    /// A tag byte the strict chart decoder does not know.
    #[error("Unknown flag in {context} at byte {position}: 0x{tag:02x}..!")]
    UnknownTag {
        context: &'static str,
        position: usize,
        tag: u8,
    },

    /// The byte after the notes section was not an accepted end-of-chart marker.
    #[error("Unexpected end-of-chart marker at byte {position}: got 0x{actual:02x}, expected 0xff or 0xe0..!")]
    BadTerminator { position: usize, actual: u8 },

    /// A catalog record did not start with `A0 A2 B2`.
    #[error("Invalid record marker at byte {position}: {found:02x?}..!")]
    InvalidRecordMarker { position: usize, found: [u8; 3] },
}

impl FormatError {
    /// Byte offset into the decoded buffer at which the error was detected.
    pub fn position(&self) -> usize {
        match self {
            FormatError::UnexpectedEof { position, .. }
            | FormatError::Mismatch { position, .. }
            | FormatError::UnknownTag { position, .. }
            | FormatError::BadTerminator { position, .. }
            | FormatError::InvalidRecordMarker { position, .. } => *position,
        }
    }
}
