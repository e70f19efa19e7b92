//! Lenient decoder for the song catalog (`VSD`) stream.
//!
//! Unlike the chart decoder, unknown tags inside a record are skipped as a
//! string and unknown field IDs are kept under a synthetic key. Only a
//! malformed record stops decoding, and records read before it are kept.

use crate::decoder::error::FormatError;
use crate::decoder::reader::TagReader;
use crate::model::catalog::{Catalog, CatalogField, DifficultyInfo, FieldValue, SongRecord};
use log::{debug, info, warn};
use std::collections::BTreeSet;

pub const CATALOG_MAGIC: [u8; 3] = *b"VSD";
pub const CATALOG_MAJOR_VERSION: u8 = 0x01;
pub const RECORD_MARKER: [u8; 3] = [0xA0, 0xA2, 0xB2];

/// Tags inside a record. Anything unrecognised falls through to [`RecordTag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordTag {
    End,
    Difficulty,
    Field,
    Other(u8),
}

impl RecordTag {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0xA1 => RecordTag::End,
            0xC0 => RecordTag::Difficulty,
            0xA2 => RecordTag::Field,
            other => RecordTag::Other(other),
        }
    }
}

/// Value encoding announced by a field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    Text,
    Flag,
    Other(u8),
}

impl FieldType {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0xB8 => FieldType::Text,
            0xB7 => FieldType::Flag,
            other => FieldType::Other(other),
        }
    }
}

/// Decode a complete catalog buffer.
///
/// A bad header is fatal. A malformed record ends the stream; the error is
/// returned in [`Catalog::aborted`] alongside the records decoded before it.
pub fn decode_catalog(bytes: &[u8]) -> Result<Catalog, FormatError> {
    let mut reader = TagReader::new(bytes);

    reader.verify_byte(CATALOG_MAGIC[0], "catalog magic[0]")?;
    reader.verify_byte(CATALOG_MAGIC[1], "catalog magic[1]")?;
    reader.verify_byte(CATALOG_MAGIC[2], "catalog magic[2]")?;
    reader.verify_byte(CATALOG_MAJOR_VERSION, "catalog major version")?;
    let version = reader.read_u8()?;
    info!("VSD header: v{}.{}", CATALOG_MAJOR_VERSION, version);

    let mut records = Vec::new();
    let mut unknown_field_ids = BTreeSet::new();
    let mut aborted = None;

    while reader.peek_u8() == Some(RECORD_MARKER[0]) {
        let start = reader.position();
        match read_record(&mut reader, &mut unknown_field_ids) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Failed to parse catalog record at byte {}: {}", start, e);
                aborted = Some(e);
                break;
            }
        }
    }

    debug!(
        "Decoded {} catalog record(s), stopped at byte {} of {}..!",
        records.len(),
        reader.position(),
        bytes.len()
    );

    if !unknown_field_ids.is_empty() {
        warn!("Unknown catalog field IDs: {:?}", unknown_field_ids);
    }

    Ok(Catalog {
        version,
        records,
        unknown_field_ids,
        aborted,
    })
}

fn read_record(
    reader: &mut TagReader<'_>,
    unknown_field_ids: &mut BTreeSet<u8>,
) -> Result<SongRecord, FormatError> {
    let position = reader.position();
    match reader.peek_bytes(RECORD_MARKER.len()) {
        Some(marker) if marker == RECORD_MARKER => {
            for _ in RECORD_MARKER {
                reader.read_u8()?;
            }
        }
        Some(marker) => {
            let mut found = [0u8; 3];
            found.copy_from_slice(marker);
            return Err(FormatError::InvalidRecordMarker { position, found });
        }
        None => {
            return Err(FormatError::UnexpectedEof {
                position,
                needed: RECORD_MARKER.len(),
            });
        }
    }

    let mut record = SongRecord::new(reader.read_u32_le()?);

    // A record may also end at EOF without its end tag.
    while let Some(byte) = reader.peek_u8() {
        let position = reader.position();
        reader.read_u8()?;

        match RecordTag::from_byte(byte) {
            RecordTag::End => break,
            RecordTag::Difficulty => {
                let display = reader.read_cstring()?;
                let constant = round_to_tenth(reader.read_f32_le()?);
                let designer = reader.read_cstring()?;
                record.difficulties.push(DifficultyInfo {
                    display,
                    constant,
                    designer,
                });
            }
            RecordTag::Field => {
                let field_type = FieldType::from_byte(reader.read_u8()?);
                let field_id = reader.read_u8()?;
                let field = CatalogField::from_id(field_id);

                match field_type {
                    FieldType::Text => {
                        let value = FieldValue::Text(reader.read_cstring()?);
                        let key = match field {
                            Some(field) => field.key().to_owned(),
                            None => {
                                debug!(
                                    "Unknown field ID {} in record {} at byte {}..!",
                                    field_id, record.song_id, position
                                );
                                unknown_field_ids.insert(field_id);
                                format!("unknown_{field_id}")
                            }
                        };
                        record.fields.insert(key, value);
                    }
                    FieldType::Flag => {
                        let value = FieldValue::Flag(reader.read_u8()? != 0);
                        let key = match field {
                            Some(field) => field.key().to_owned(),
                            None => format!("unknown_bool_{field_id}"),
                        };
                        record.fields.insert(key, value);
                    }
                    FieldType::Other(sub_type) => {
                        debug!(
                            "Skipping field {} with unknown sub-type 0x{:02x} at byte {}..!",
                            field_id, sub_type, position
                        );
                        reader.skip_cstring()?;
                    }
                }
            }
            RecordTag::Other(tag) => {
                debug!("Skipping unknown record tag 0x{:02x} at byte {}..!", tag, position);
                reader.skip_cstring()?;
            }
        }
    }

    Ok(record)
}

/// Round a chart constant to one decimal place, working on the exact widened
/// value rather than multiplying in floating point.
fn round_to_tenth(value: f32) -> f64 {
    let wide = value as f64;
    format!("{wide:.1}").parse().unwrap_or(wide)
}
