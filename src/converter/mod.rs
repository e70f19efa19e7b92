//! Conversion of decoded chart notes into the target note schema.
//!
//! Events are converted to exact times, split into two independent zones of
//! two lanes each, and sorted. Every zone is then walked in time order: plain
//! notes map straight through the lane table, while runs of consecutive
//! bumpers are handed to [`chain`] for lane resolution. Zone A is emitted in
//! full before zone B.

mod chain;
pub mod time;

use crate::decoder::{FormatError, decode_chart};
use crate::model::chart::{NoteKind, RawNoteEvent};
use crate::model::mapper::{offset_for_lane, offset_for_zone};
use crate::model::note::{OutputKind, OutputNote};
use log::debug;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
pub use time::ChartTime;

/// One of the two independent lane pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Lanes 0 and 1.
    A,
    /// Lanes 2 and 3.
    B,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::A, Zone::B];

    pub fn base_lane(self) -> u8 {
        match self {
            Zone::A => 0,
            Zone::B => 2,
        }
    }

    pub fn lanes(self) -> [u8; 2] {
        let base = self.base_lane();
        [base, base + 1]
    }

    /// The partner of `lane` within this zone.
    pub fn other_lane(self, lane: u8) -> Option<u8> {
        let [first, second] = self.lanes();
        match lane {
            l if l == first => Some(second),
            l if l == second => Some(first),
            _ => None,
        }
    }

    /// Lane a chain starts on when neither neighbour says otherwise.
    pub fn default_tendency(self) -> u8 {
        match self {
            Zone::A => 1,
            Zone::B => 2,
        }
    }

    /// Zone of a chip, hold or mine: lanes 0 and 1 are zone A, everything else B.
    fn for_lane(lane: u8) -> Zone {
        if lane <= 1 { Zone::A } else { Zone::B }
    }

    /// Zone of a bumper or bumper mine, which store the zone's first lane.
    fn from_base_lane(lane: u8) -> Option<Zone> {
        Zone::ALL.into_iter().find(|z| z.base_lane() == lane)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.lanes();
        write!(f, "{}/{}", first, second)
    }
}

/// Fatal errors while converting a decoded chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Both lanes of a zone are held down over a bumper, which cannot be played.
    #[error("Lanes {zone} both have a hold covering the bumper at {time} (note #{index})..!")]
    AuthoringConflict {
        zone: Zone,
        time: ChartTime,
        index: usize,
    },

    /// A hold without its end-time extra field.
    #[error("Hold note #{index} has no end time..!")]
    MissingHoldEnd { index: usize },

    /// A chip or hold on a lane with no position.
    #[error("Note #{index} ({kind:?}) is on unknown lane {lane}..!")]
    InvalidLane {
        index: usize,
        kind: NoteKind,
        lane: u8,
    },

    /// A bumper whose lane does not name a zone.
    #[error("Note #{index} ({kind:?}) names unknown zone lane {lane}..!")]
    InvalidZoneLane {
        index: usize,
        kind: NoteKind,
        lane: u8,
    },
}

/// Any failure that aborts a chart's conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimedKind {
    Chip,
    Bumper,
    Hold,
    Mine,
    BumperMine,
}

/// A supported note with exact times and its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimedEvent {
    pub start: ChartTime,
    pub kind: TimedKind,
    pub lane: u8,
    /// Position in the decoded note list.
    pub index: usize,
    pub end: ChartTime,
    pub zone: Zone,
}

impl TimedEvent {
    pub fn is_bumper(&self) -> bool {
        self.kind == TimedKind::Bumper
    }

    /// When the note stops occupying its lane.
    pub fn effective_time(&self) -> ChartTime {
        if self.kind == TimedKind::Hold {
            self.end
        } else {
            self.start
        }
    }
}

/// A converted chart, ready for an assembler to embed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedChart {
    pub num_of_notes: usize,
    pub notes: Vec<OutputNote>,
}

/// Decode a chart buffer and convert its notes in one step.
pub fn convert_chart(bytes: &[u8]) -> Result<ConvertedChart, ConvertError> {
    let events = decode_chart(bytes)?;
    let notes = transform(&events)?;
    Ok(ConvertedChart {
        num_of_notes: notes.len(),
        notes,
    })
}

/// Convert decoded chart notes into target-schema notes.
///
/// Unsupported kinds are dropped without notice; every other event produces
/// exactly one output note. The output is grouped by zone, not re-sorted.
pub fn transform(events: &[RawNoteEvent]) -> Result<Vec<OutputNote>, TransformError> {
    let mut timed = timed_events(events)?;
    // Stable, so simultaneous notes keep their file order.
    timed.sort_by_key(|e| e.start);

    let mut notes = Vec::with_capacity(timed.len());
    for zone in Zone::ALL {
        let zone_events: Vec<TimedEvent> =
            timed.iter().filter(|e| e.zone == zone).copied().collect();
        convert_zone(zone, &zone_events, &mut notes)?;
    }

    Ok(notes)
}

fn timed_events(events: &[RawNoteEvent]) -> Result<Vec<TimedEvent>, TransformError> {
    let mut timed = Vec::with_capacity(events.len());

    for (index, event) in events.iter().enumerate() {
        let kind = match event.kind {
            NoteKind::Chip => TimedKind::Chip,
            NoteKind::Bumper | NoteKind::BumperAlt => TimedKind::Bumper,
            NoteKind::Hold => TimedKind::Hold,
            NoteKind::Mine => TimedKind::Mine,
            NoteKind::BumperMine => TimedKind::BumperMine,
            NoteKind::Other(_) => continue,
        };

        let start = ChartTime::from_raw_ms(event.time);
        let end = if kind == TimedKind::Hold {
            let end_ms = event
                .hold_end_ms()
                .ok_or(TransformError::MissingHoldEnd { index })?;
            ChartTime::from_whole_ms(end_ms)
        } else {
            start
        };

        let zone = match kind {
            TimedKind::Bumper | TimedKind::BumperMine => Zone::from_base_lane(event.lane)
                .ok_or(TransformError::InvalidZoneLane {
                    index,
                    kind: event.kind,
                    lane: event.lane,
                })?,
            TimedKind::Chip | TimedKind::Hold if offset_for_lane(event.lane).is_none() => {
                return Err(TransformError::InvalidLane {
                    index,
                    kind: event.kind,
                    lane: event.lane,
                });
            }
            TimedKind::Chip | TimedKind::Hold | TimedKind::Mine => Zone::for_lane(event.lane),
        };

        timed.push(TimedEvent {
            start,
            kind,
            lane: event.lane,
            index,
            end,
            zone,
        });
    }

    Ok(timed)
}

fn convert_zone(
    zone: Zone,
    events: &[TimedEvent],
    notes: &mut Vec<OutputNote>,
) -> Result<(), TransformError> {
    let mut i = 0;
    while i < events.len() {
        if let Some(note) = direct_note(&events[i]) {
            notes.push(note);
            i += 1;
            continue;
        }

        let chain_start = i;
        let mut chain_end = i;
        while events.get(chain_end + 1).is_some_and(TimedEvent::is_bumper) {
            chain_end += 1;
        }

        debug!(
            "Resolving bumper chain of {} in zone {} at {}..!",
            chain_end - chain_start + 1,
            zone,
            events[chain_start].start
        );
        chain::resolve_chain(zone, events, chain_start, chain_end, notes)?;
        i = chain_end + 1;
    }

    Ok(())
}

/// Map a note through the fixed lane table. Bumpers have no direct mapping.
fn direct_note(event: &TimedEvent) -> Option<OutputNote> {
    let start = event.start.to_triple();
    let end = event.end.to_triple();
    let lane_offset = offset_for_lane(event.lane).unwrap_or(0.0);

    let note = match event.kind {
        TimedKind::Bumper => return None,
        TimedKind::Chip => OutputNote::new(OutputKind::Tap, lane_offset, start, end),
        TimedKind::Hold => OutputNote::new(OutputKind::Hold, lane_offset, start, end),
        TimedKind::Mine => OutputNote::new(OutputKind::Fake, lane_offset, start, end).into_fake(),
        TimedKind::BumperMine => {
            let zone_offset = offset_for_zone(event.lane).unwrap_or(0.0);
            let mut note = OutputNote::new(OutputKind::Fake, zone_offset, start, end).into_fake();
            note.size = OutputNote::BUMPER_MINE_SIZE;
            note
        }
    };

    Some(note)
}
