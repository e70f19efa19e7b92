use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Raw note kind byte as stored in a chart stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteKind {
    /// Instantaneous single-lane note.
    #[default]
    Chip,

    /// Chain-capable note whose final lane is resolved by alternation.
    Bumper,

    /// Note spanning a start and end time on one lane.
    Hold,

    Mine,

    BumperMine,

    /// Second encoding of a bumper, chained exactly like [`NoteKind::Bumper`].
    BumperAlt,

    /// Any kind the converter does not support.
    Other(u8),
}

impl NoteKind {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => NoteKind::Chip,
            1 => NoteKind::Bumper,
            2 => NoteKind::Hold,
            6 => NoteKind::Mine,
            7 => NoteKind::BumperMine,
            8 => NoteKind::BumperAlt,
            other => NoteKind::Other(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            NoteKind::Chip => 0,
            NoteKind::Bumper => 1,
            NoteKind::Hold => 2,
            NoteKind::Mine => 6,
            NoteKind::BumperMine => 7,
            NoteKind::BumperAlt => 8,
            NoteKind::Other(other) => other,
        }
    }

    pub fn is_supported(self) -> bool {
        !matches!(self, NoteKind::Other(_))
    }
}

impl Serialize for NoteKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_byte())
    }
}

/// A value from a note's extra map; holds store integers, everything else floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Int(i32),
    Float(f32),
}

impl ExtraValue {
    pub fn as_i64(self) -> i64 {
        match self {
            ExtraValue::Int(v) => v as i64,
            ExtraValue::Float(v) => v as i64,
        }
    }
}

/// One note as decoded from a chart stream, before any conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawNoteEvent {
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub lane: u8,
    /// Milliseconds from the start of the chart.
    pub time: f32,
    pub extra: BTreeMap<u8, ExtraValue>,
}

impl RawNoteEvent {
    /// Extra field holding a hold's end time in milliseconds.
    pub const HOLD_END_ID: u8 = 1;

    pub fn hold_end_ms(&self) -> Option<i64> {
        self.extra.get(&Self::HOLD_END_ID).map(|v| v.as_i64())
    }
}
