//! Cursor-based primitive reads shared by the chart and catalog decoders.

use crate::decoder::error::FormatError;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor};

type Result<T> = std::result::Result<T, FormatError>;

/// A forward-only reader over a fully buffered tagged stream.
///
/// Callers build their record loops by peeking or reading a tag byte and
/// dispatching on it; the reader itself knows nothing about tags.
#[derive(Debug)]
pub struct TagReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> TagReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.cursor.get_ref().get(self.position()).copied()
    }

    /// Look at the next `n` bytes without consuming them.
    pub fn peek_bytes(&self, n: usize) -> Option<&'a [u8]> {
        let start = self.position();
        let bytes: &'a [u8] = self.cursor.get_ref();
        bytes.get(start..start.checked_add(n)?)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let position = self.position();
        self.cursor.read_u8().map_err(|e| eof(e, position, 1))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let position = self.position();
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| eof(e, position, 4))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        let position = self.position();
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|e| eof(e, position, 4))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        let position = self.position();
        self.cursor
            .read_f32::<LittleEndian>()
            .map_err(|e| eof(e, position, 4))
    }

    /// Read bytes up to (and consuming) the next `0` byte.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. A buffer that ends
    /// before the terminator is a truncated read.
    pub fn read_cstring(&mut self) -> Result<String> {
        let start = self.position();
        let bytes: &'a [u8] = self.cursor.get_ref();
        let tail = bytes.get(start..).unwrap_or_default();

        let Some(len) = tail.iter().position(|&b| b == 0) else {
            return Err(FormatError::UnexpectedEof {
                position: bytes.len(),
                needed: 1,
            });
        };

        let text = String::from_utf8_lossy(&tail[..len]).into_owned();
        self.cursor.set_position((start + len + 1) as u64);
        Ok(text)
    }

    pub fn skip_cstring(&mut self) -> Result<()> {
        self.read_cstring().map(|_| ())
    }

    /// Consume one byte and fail with a [`FormatError::Mismatch`] if it is not `expected`.
    pub fn verify_byte(&mut self, expected: u8, what: &'static str) -> Result<()> {
        let position = self.position();
        let actual = self.read_u8()?;
        if actual != expected {
            return Err(FormatError::Mismatch {
                what,
                position,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

fn eof(_err: io::Error, position: usize, needed: usize) -> FormatError {
    // Cursor reads over an in-memory slice only fail on a short buffer.
    FormatError::UnexpectedEof { position, needed }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_width_little_endian_reads() {
        let mut bytes = vec![0x7f];
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-42i32).to_le_bytes());
        bytes.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let mut reader = TagReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 0x7f);
        assert_eq!(reader.read_f32_le().unwrap(), 1.5);
        assert_eq!(reader.read_i32_le().unwrap(), -42);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert!(reader.is_empty());
    }

    #[test]
    fn truncated_read_reports_position() {
        let bytes = [0x01, 0x02, 0x03];
        let mut reader = TagReader::new(&bytes);
        reader.read_u8().unwrap();

        let err = reader.read_f32_le().unwrap_err();
        assert_eq!(
            err,
            FormatError::UnexpectedEof {
                position: 1,
                needed: 4
            }
        );
    }

    #[test]
    fn cstring_replaces_invalid_utf8() {
        let bytes = [b'o', b'k', 0xff, 0x00, b'x'];
        let mut reader = TagReader::new(&bytes);

        assert_eq!(reader.read_cstring().unwrap(), "ok\u{FFFD}");
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.peek_u8(), Some(b'x'));
    }

    #[test]
    fn cstring_without_terminator_is_truncated() {
        let bytes = [b'a', b'b'];
        let mut reader = TagReader::new(&bytes);

        assert!(matches!(
            reader.read_cstring(),
            Err(FormatError::UnexpectedEof { .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn verify_byte_carries_expected_and_actual() {
        let bytes = [0x56, 0x54];
        let mut reader = TagReader::new(&bytes);
        reader.verify_byte(0x56, "file magic[0]").unwrap();

        let err = reader.verify_byte(0x53, "file magic[1]").unwrap_err();
        assert_eq!(
            err,
            FormatError::Mismatch {
                what: "file magic[1]",
                position: 1,
                expected: 0x53,
                actual: 0x54,
            }
        );
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn peek_does_not_consume() {
        let bytes = [0xA0, 0xA2, 0xB2, 0x00];
        let reader = TagReader::new(&bytes);

        assert_eq!(reader.peek_bytes(3), Some(&bytes[..3]));
        assert_eq!(reader.peek_bytes(5), None);
        assert_eq!(reader.position(), 0);
    }
}
