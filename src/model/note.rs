use serde::{Serialize, Serializer};

/// Note type in the target schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Chips and every resolved bumper.
    Tap,
    Hold,
    /// Mines of both kinds, emitted as fake notes.
    Fake,
}

impl OutputKind {
    pub fn code(self) -> u8 {
        match self {
            OutputKind::Tap => 1,
            OutputKind::Hold => 2,
            OutputKind::Fake => 3,
        }
    }
}

impl Serialize for OutputKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// `[whole, numerator, denominator]` beat triple.
///
/// `whole * denominator + numerator` is the numerator of the exact time in
/// seconds over `denominator`, with `0 <= numerator < denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeTriple(pub i64, pub i64, pub i64);

impl TimeTriple {
    pub fn whole(&self) -> i64 {
        self.0
    }

    pub fn numerator(&self) -> i64 {
        self.1
    }

    pub fn denominator(&self) -> i64 {
        self.2
    }

    /// Numerator of the whole time over [`TimeTriple::denominator`].
    pub fn total_numerator(&self) -> i64 {
        self.0 * self.2 + self.1
    }
}

/// A note in the target schema, including its fixed template fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputNote {
    pub above: u8,
    pub alpha: u8,
    pub color: [u8; 3],
    pub end_time: TimeTriple,
    pub is_fake: u8,
    pub judge_area: f64,
    #[serde(rename = "positionX")]
    pub lane_offset: f64,
    pub size: f64,
    pub speed: f64,
    pub start_time: TimeTriple,
    #[serde(rename = "type")]
    pub kind: OutputKind,
    pub visible_time: f64,
    pub y_offset: f64,
}

impl OutputNote {
    pub const FAKE_ALPHA: u8 = 127;
    pub const BUMPER_MINE_SIZE: f64 = 2.6;

    /// A note with the template defaults: visible, real, full size.
    pub fn new(kind: OutputKind, lane_offset: f64, start_time: TimeTriple, end_time: TimeTriple) -> Self {
        Self {
            above: 1,
            alpha: 255,
            color: [255, 255, 255],
            end_time,
            is_fake: 0,
            judge_area: 1.0,
            lane_offset,
            size: 1.0,
            speed: 1.0,
            start_time,
            kind,
            visible_time: 1.0,
            y_offset: 0.0,
        }
    }

    /// Same note rendered as a translucent fake.
    pub fn into_fake(mut self) -> Self {
        self.is_fake = 1;
        self.alpha = Self::FAKE_ALPHA;
        self
    }

    pub fn is_fake(&self) -> bool {
        self.is_fake != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serializes_to_template_layout() {
        let start = TimeTriple(1, 1, 2);
        let note = OutputNote::new(OutputKind::Hold, -135.0, start, TimeTriple(3, 0, 1));
        let json = serde_json::to_value(&note).unwrap();

        assert_eq!(json["type"], 2);
        assert_eq!(json["positionX"], -135.0);
        assert_eq!(json["startTime"], serde_json::json!([1, 1, 2]));
        assert_eq!(json["endTime"], serde_json::json!([3, 0, 1]));
        assert_eq!(json["isFake"], 0);
        assert_eq!(json["judgeArea"], 1.0);
        assert_eq!(json["visibleTime"], 1.0);
        assert_eq!(json["yOffset"], 0.0);
        assert_eq!(json["color"], serde_json::json!([255, 255, 255]));
    }

    #[test]
    fn fake_notes_are_translucent() {
        let t = TimeTriple(1, 0, 1);
        let note = OutputNote::new(OutputKind::Fake, 0.0, t, t).into_fake();
        assert!(note.is_fake());
        assert_eq!(note.alpha, 127);
    }
}
