//! Strict decoder for the per-chart note stream.
//!
//! ```text
//! 56 53 43 01 00          magic
//! C0                      notes section start
//!   A0 <tags...> A1       one note record, repeated
//! C1                      notes section end
//! FF | E0                 end of chart
//! ```
//!
//! Any unknown tag is fatal and aborts the whole chart.

use crate::decoder::error::FormatError;
use crate::decoder::reader::TagReader;
use crate::model::chart::{ExtraValue, NoteKind, RawNoteEvent};
use log::debug;

pub const CHART_MAGIC: [u8; 5] = [0x56, 0x53, 0x43, 0x01, 0x00];
const MAGIC_LABELS: [&str; 5] = [
    "file magic[0]",
    "file magic[1]",
    "file magic[2]",
    "file magic[3]",
    "file magic[4]",
];
pub const SECTION_START: u8 = 0xC0;
pub const END_MARKERS: [u8; 2] = [0xFF, 0xE0];

/// Tags allowed directly inside the notes section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionTag {
    Note,
    SectionEnd,
}

impl SectionTag {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xA0 => Some(SectionTag::Note),
            0xC1 => Some(SectionTag::SectionEnd),
            _ => None,
        }
    }
}

/// Tags allowed inside a note record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteTag {
    End,
    Kind,
    Lane,
    Time,
    Extra,
}

impl NoteTag {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xA1 => Some(NoteTag::End),
            0xA2 => Some(NoteTag::Kind),
            0xA3 => Some(NoteTag::Lane),
            0xA4 => Some(NoteTag::Time),
            0xA6 => Some(NoteTag::Extra),
            _ => None,
        }
    }
}

const EXTRA_END: u8 = 0xA7;

/// Decode a complete chart buffer into its raw note events, in file order.
pub fn decode_chart(bytes: &[u8]) -> Result<Vec<RawNoteEvent>, FormatError> {
    let mut reader = TagReader::new(bytes);

    for (magic_byte, what) in CHART_MAGIC.into_iter().zip(MAGIC_LABELS) {
        reader.verify_byte(magic_byte, what)?;
    }
    reader.verify_byte(SECTION_START, "notes section start")?;

    let mut notes = Vec::new();
    loop {
        let position = reader.position();
        let tag = reader.read_u8()?;
        match SectionTag::from_byte(tag) {
            Some(SectionTag::Note) => notes.push(read_note(&mut reader)?),
            Some(SectionTag::SectionEnd) => break,
            None => {
                return Err(FormatError::UnknownTag {
                    context: "notes section",
                    position,
                    tag,
                });
            }
        }
    }

    let position = reader.position();
    let marker = reader.read_u8()?;
    if !END_MARKERS.contains(&marker) {
        return Err(FormatError::BadTerminator {
            position,
            actual: marker,
        });
    }

    if !reader.is_empty() {
        debug!(
            "Ignoring {} trailing byte(s) after the end-of-chart marker..!",
            reader.remaining()
        );
    }
    debug!("Decoded {} raw note(s)..!", notes.len());

    Ok(notes)
}

fn read_note(reader: &mut TagReader<'_>) -> Result<RawNoteEvent, FormatError> {
    let mut note = RawNoteEvent::default();

    loop {
        let position = reader.position();
        let tag = reader.read_u8()?;
        match NoteTag::from_byte(tag) {
            Some(NoteTag::End) => break,
            Some(NoteTag::Kind) => note.kind = NoteKind::from_byte(reader.read_u8()?),
            Some(NoteTag::Lane) => note.lane = reader.read_u8()?,
            Some(NoteTag::Time) => note.time = reader.read_f32_le()?,
            Some(NoteTag::Extra) => {
                // Entries are `[marker][id][value]`; the value width follows the
                // kind decoded so far, so a hold stores integers.
                note.extra.clear();
                while reader.read_u8()? != EXTRA_END {
                    let id = reader.read_u8()?;
                    let value = if note.kind == NoteKind::Hold {
                        ExtraValue::Int(reader.read_i32_le()?)
                    } else {
                        ExtraValue::Float(reader.read_f32_le()?)
                    };
                    note.extra.insert(id, value);
                }
            }
            None => {
                return Err(FormatError::UnknownTag {
                    context: "note",
                    position,
                    tag,
                });
            }
        }
    }

    Ok(note)
}
