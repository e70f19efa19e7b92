use crate::decoder::FormatError;
use crate::model::difficulty::Difficulty;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Registry of the named catalog fields, keyed by their one-byte field ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogField {
    Name,
    FormattedName,
    Artist,
    ChartId,
    BpmDisplay,
    Version,
    HasEncore,
    IsOriginal,
    JacketArtist,
    IsPublished,
    Genre,
    UnlockId,
    PreviewStartTime,
    PreviewEndTime,
}

pub const CATALOG_FIELDS: &[(u8, CatalogField, &str)] = &[
    (1, CatalogField::Name, "name"),
    (2, CatalogField::FormattedName, "formatted_name"),
    (3, CatalogField::Artist, "artist"),
    (4, CatalogField::ChartId, "chart_id"),
    (5, CatalogField::BpmDisplay, "bpm_display"),
    (6, CatalogField::Version, "version"),
    (7, CatalogField::HasEncore, "has_encore"),
    (8, CatalogField::IsOriginal, "is_original"),
    (9, CatalogField::JacketArtist, "jacket_artist"),
    (10, CatalogField::IsPublished, "is_published"),
    (11, CatalogField::Genre, "genre"),
    (12, CatalogField::UnlockId, "unlock_id"),
    (13, CatalogField::PreviewStartTime, "preview_start_time"),
    (14, CatalogField::PreviewEndTime, "preview_end_time"),
];

impl CatalogField {
    pub fn from_id(id: u8) -> Option<Self> {
        CATALOG_FIELDS
            .iter()
            .find(|(field_id, _, _)| *field_id == id)
            .map(|(_, field, _)| *field)
    }

    pub fn key(self) -> &'static str {
        CATALOG_FIELDS
            .iter()
            .find(|(_, field, _)| *field == self)
            .map(|(_, _, key)| *key)
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// One `(display label, chart constant, note designer)` tuple of a song.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DifficultyInfo {
    pub display: String,
    /// Chart constant rounded to one decimal place.
    pub constant: f64,
    pub designer: String,
}

/// A single song entry from the catalog stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SongRecord {
    pub song_id: u32,
    /// Named fields under their registry key, unknown ones under a synthetic key.
    pub fields: BTreeMap<String, FieldValue>,
    /// Difficulty tuples in the order they were encountered.
    pub difficulties: Vec<DifficultyInfo>,
}

impl SongRecord {
    pub fn new(song_id: u32) -> Self {
        Self {
            song_id,
            ..Default::default()
        }
    }

    pub fn text(&self, field: CatalogField) -> Option<&str> {
        match self.fields.get(field.key()) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, field: CatalogField) -> Option<bool> {
        match self.fields.get(field.key()) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Difficulty tuple by its 1-based level.
    pub fn difficulty(&self, level: usize) -> Option<&DifficultyInfo> {
        level.checked_sub(1).and_then(|i| self.difficulties.get(i))
    }

    /// Level text such as `FN Lv.12`, falling back to `0` for a missing display label.
    pub fn level_label(&self, difficulty: Difficulty) -> String {
        let display = self
            .difficulty(difficulty.level())
            .map(|d| d.display.as_str())
            .unwrap_or("0");
        format!("{} Lv.{}", difficulty.abbreviation(), display)
    }

    pub fn designer(&self, difficulty: Difficulty) -> Option<&str> {
        self.difficulty(difficulty.level())
            .map(|d| d.designer.as_str())
    }
}

impl Serialize for SongRecord {
    /// Flattens difficulty tuples into `difficulty_display_N`, `difficulty_constant_N`
    /// and `note_designer_N` keys after the named fields.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(
            2 + self.fields.len() + self.difficulties.len() * 3,
        ))?;
        map.serialize_entry("_record_id", &self.song_id)?;
        map.serialize_entry("song_id", &self.song_id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        for (i, difficulty) in self.difficulties.iter().enumerate() {
            let n = i + 1;
            map.serialize_entry(&format!("difficulty_display_{n}"), &difficulty.display)?;
            map.serialize_entry(&format!("difficulty_constant_{n}"), &difficulty.constant)?;
            map.serialize_entry(&format!("note_designer_{n}"), &difficulty.designer)?;
        }
        map.end()
    }
}

/// Everything decoded from one catalog stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Minor version byte from the `VSD` header.
    pub version: u8,
    pub records: Vec<SongRecord>,
    /// String field IDs that are not in the registry, across the whole stream.
    pub unknown_field_ids: BTreeSet<u8>,
    /// The error that stopped decoding early, if any. Records before it are kept.
    pub aborted: Option<FormatError>,
}

impl Catalog {
    /// Look up a song by its `chart_id` field.
    pub fn find_chart(&self, chart_id: &str) -> Option<&SongRecord> {
        self.records
            .iter()
            .find(|r| r.text(CatalogField::ChartId) == Some(chart_id))
    }
}
