//! Lane resolution for runs of consecutive bumpers within one zone.
//!
//! Bumpers carry only their zone, so each one has to be placed on one of the
//! zone's two physical lanes:
//!
//! 1. A bumper played while exactly one lane is held down goes on the other
//!    lane and leaves the chain. Both lanes held is an authoring error.
//! 2. The remaining bumpers alternate, starting opposite the note before the
//!    chain (the virtual head).
//! 3. If the alternation does not end opposite the note after the chain (the
//!    tail), the assignments after the widest time gap are flipped.

use super::{ChartTime, TimedEvent, TimedKind, TransformError, Zone};
use crate::model::mapper::bumper_offset;
use crate::model::note::{OutputKind, OutputNote};
use log::debug;

/// A neighbouring note a chain orients itself against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub time: ChartTime,
    pub lane: u8,
}

/// Resolve the chain `events[chain_start..=chain_end]` and append its notes.
pub(crate) fn resolve_chain(
    zone: Zone,
    events: &[TimedEvent],
    chain_start: usize,
    chain_end: usize,
    notes: &mut Vec<OutputNote>,
) -> Result<(), TransformError> {
    let mut members = Vec::with_capacity(chain_end + 1 - chain_start);
    for member in &events[chain_start..=chain_end] {
        match covering_hold(zone, events, chain_start, member)? {
            Some(held_lane) => {
                let lane = zone.other_lane(held_lane).unwrap_or(held_lane);
                debug!(
                    "Bumper at {} is covered by a hold on lane {}, placing it on lane {}..!",
                    member.start, held_lane, lane
                );
                notes.push(bumper_note(zone, lane, member.start));
            }
            None => members.push(member.start),
        }
    }

    if members.is_empty() {
        return Ok(());
    }

    let head = virtual_head(zone, events, chain_start);
    let tail = tail_note(events, chain_end);

    let head_tendency = head.and_then(|h| tendency(zone, h.lane));
    let tail_tendency = tail.and_then(|t| tendency(zone, t.lane));
    let (head_tendency, tail_tendency) = match (head_tendency, tail_tendency) {
        (Some(h), Some(t)) => (h, Some(t)),
        (Some(h), None) => (h, Some(h)),
        (None, Some(t)) => (t, Some(t)),
        (None, None) => (zone.default_tendency(), None),
    };

    let mut lanes = alternate(zone, head_tendency, members.len());

    if let Some(tail_lane) = tail_tendency
        && lanes.last() != Some(&tail_lane)
        && let Some(flip_from) = widest_gap(head.map(|h| h.time), &members, tail.map(|t| t.time))
    {
        debug!(
            "Chain ends on lane {:?} but the tail wants lane {}, flipping from member {}..!",
            lanes.last(),
            tail_lane,
            flip_from
        );
        for lane in lanes.iter_mut().skip(flip_from) {
            *lane = zone.other_lane(*lane).unwrap_or(*lane);
        }
    }

    for (start, lane) in members.into_iter().zip(lanes) {
        notes.push(bumper_note(zone, lane, start));
    }

    Ok(())
}

/// The lane held down by an earlier hold when `member` is played, if any.
///
/// Each of the zone's lanes is searched backward from just before the chain.
fn covering_hold(
    zone: Zone,
    events: &[TimedEvent],
    chain_start: usize,
    member: &TimedEvent,
) -> Result<Option<u8>, TransformError> {
    let mut covered = None;

    for lane in zone.lanes() {
        let held = events[..chain_start]
            .iter()
            .rev()
            .any(|e| e.lane == lane && e.kind == TimedKind::Hold && e.end >= member.start);

        if held {
            if covered.is_some() {
                return Err(TransformError::AuthoringConflict {
                    zone,
                    time: member.start,
                    index: member.index,
                });
            }
            covered = Some(lane);
        }
    }

    Ok(covered)
}

/// The note the chain continues from.
///
/// Takes the nearest earlier note on each of the zone's lanes, timed by when
/// it releases the lane. The later one wins. On an exact tie a lone chip wins,
/// two chips leave the head undetermined, and otherwise the zone's first lane
/// wins.
pub(crate) fn virtual_head(zone: Zone, events: &[TimedEvent], chain_start: usize) -> Option<Anchor> {
    let before = &events[..chain_start];
    let candidates: Vec<(Anchor, bool)> = zone
        .lanes()
        .into_iter()
        .filter_map(|lane| before.iter().rev().find(|e| e.lane == lane))
        .map(|e| {
            let anchor = Anchor {
                time: e.effective_time(),
                lane: e.lane,
            };
            (anchor, e.kind == TimedKind::Chip)
        })
        .collect();

    match candidates.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        [(first, first_chip), (second, second_chip)] if first.time == second.time => {
            match (*first_chip, *second_chip) {
                (true, true) => None,
                (false, true) => Some(*second),
                _ => Some(*first),
            }
        }
        [(first, _), (second, _)] => Some(if second.time > first.time { *second } else { *first }),
        _ => None,
    }
}

/// The first non-bumper note after the chain, timed by its start.
///
/// There is no tie handling between simultaneous notes here, unlike
/// [`virtual_head`]: the earliest in sorted order is used.
pub(crate) fn tail_note(events: &[TimedEvent], chain_end: usize) -> Option<Anchor> {
    events
        .get(chain_end + 1..)?
        .iter()
        .find(|e| !e.is_bumper())
        .map(|e| Anchor {
            time: e.start,
            lane: e.lane,
        })
}

/// Lane a chain should sit on next to a neighbour on `lane`: the other one.
pub(crate) fn tendency(zone: Zone, lane: u8) -> Option<u8> {
    zone.other_lane(lane)
}

pub(crate) fn alternate(zone: Zone, first: u8, count: usize) -> Vec<u8> {
    let mut lanes = Vec::with_capacity(count);
    let mut current = first;
    for _ in 0..count {
        lanes.push(current);
        current = zone.other_lane(current).unwrap_or(current);
    }
    lanes
}

/// Index of the first member after the widest gap in the chain's timeline.
///
/// Gaps are head→first member, between consecutive members, and last
/// member→tail. Equal gaps resolve to the later one. Returns `members.len()`
/// when the tail gap wins, in which case nothing is flipped.
pub(crate) fn widest_gap(
    head: Option<ChartTime>,
    members: &[ChartTime],
    tail: Option<ChartTime>,
) -> Option<usize> {
    let first = *members.first()?;
    let last = *members.last()?;

    let head_gap = head.map(|h| (first.since(h), 0));
    let inner_gaps = members
        .windows(2)
        .enumerate()
        .map(|(j, pair)| (pair[1].since(pair[0]), j + 1));
    let tail_gap = tail.map(|t| (t.since(last), members.len()));

    head_gap
        .into_iter()
        .chain(inner_gaps)
        .chain(tail_gap)
        .max()
        .map(|(_, flip_from)| flip_from)
}

fn bumper_note(zone: Zone, lane: u8, start: ChartTime) -> OutputNote {
    let time = start.to_triple();
    OutputNote::new(OutputKind::Tap, bumper_offset(zone.base_lane(), lane), time, time)
}

#[cfg(test)]
mod test {
    use super::super::test::{bumper, chip, hold, offsets, raw};
    use super::super::transform;
    use super::*;

    // Zone A bumper positions.
    const LANE0: f64 = -355.0;
    const LANE1: f64 = -185.0;

    fn t(ms: i64) -> ChartTime {
        ChartTime::from_whole_ms(ms)
    }

    fn bumper_offsets(notes: &[OutputNote], range: std::ops::Range<usize>) -> Vec<f64> {
        offsets(&notes[range])
    }

    #[test]
    fn dual_hold_coverage_is_a_conflict() {
        env_logger::try_init().unwrap_or(());

        let events = vec![hold(0, 0.0, 5000), hold(1, 0.0, 5000), bumper(0, 2000.0)];
        assert_eq!(
            transform(&events),
            Err(TransformError::AuthoringConflict {
                zone: Zone::A,
                time: t(2000),
                index: 2,
            })
        );
    }

    #[test]
    fn single_hold_coverage_places_bumper_opposite() {
        env_logger::try_init().unwrap_or(());

        let notes = transform(&[hold(0, 0.0, 5000), bumper(0, 2000.0)]).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].kind, OutputKind::Hold);
        assert_eq!(notes[1].kind, OutputKind::Tap);
        assert_eq!(notes[1].lane_offset, LANE1);
        assert_eq!(notes[1].start_time, notes[1].end_time);

        let notes = transform(&[hold(1, 0.0, 5000), bumper(0, 2000.0)]).unwrap();
        assert_eq!(notes[1].lane_offset, LANE0);

        let notes = transform(&[hold(3, 0.0, 5000), bumper(2, 5000.0)]).unwrap();
        assert_eq!(notes[1].lane_offset, 185.0);
    }

    #[test]
    fn hold_released_before_bumper_does_not_cover() {
        let notes = transform(&[hold(0, 0.0, 1999), hold(1, 0.0, 100), bumper(0, 2000.0)]).unwrap();
        // Head is the lane 0 hold (released last), so the bumper goes on lane 1.
        assert_eq!(notes[2].lane_offset, LANE1);
    }

    #[test]
    fn covered_members_are_emitted_first() {
        let events = vec![hold(0, 0.0, 150), bumper(0, 100.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1].start_time, t(100).to_triple());
        assert_eq!(notes[1].lane_offset, LANE1);
        // Head is the lane 0 hold, so the remaining member starts on lane 1.
        assert_eq!(notes[2].start_time, t(200).to_triple());
        assert_eq!(notes[2].lane_offset, LANE1);
    }

    #[test]
    fn pure_alternation_from_head() {
        env_logger::try_init().unwrap_or(());

        // Head on lane 0 pushes the chain to start on lane 1; tail on lane 1
        // wants it to end on lane 0, which alternation already does.
        let events = vec![
            chip(0, 0.0),
            bumper(0, 100.0),
            bumper(0, 200.0),
            raw(8, 0, 300.0),
            bumper(0, 400.0),
            chip(1, 500.0),
        ];
        let notes = transform(&events).unwrap();

        assert_eq!(notes.len(), 6);
        assert_eq!(bumper_offsets(&notes, 1..5), vec![LANE1, LANE0, LANE1, LANE0]);
        assert!(notes[1..5].iter().all(|n| n.kind == OutputKind::Tap));
        assert_eq!(notes[5].lane_offset, -135.0);
    }

    #[test]
    fn reconciliation_flips_after_widest_gap() {
        env_logger::try_init().unwrap_or(());

        // Naive alternation gives 1,0,1 but the tail on lane 1 wants lane 0 last.
        // The 500ms gap between members 2 and 3 is the widest.
        let events = vec![
            chip(0, 0.0),
            bumper(0, 100.0),
            bumper(0, 200.0),
            bumper(0, 700.0),
            chip(1, 800.0),
        ];
        let notes = transform(&events).unwrap();

        assert_eq!(bumper_offsets(&notes, 1..4), vec![LANE1, LANE0, LANE0]);
    }

    #[test]
    fn reconciliation_prefers_later_gap_on_tie() {
        // Gaps: head 100, inner 100, tail 50. Head and inner tie, inner wins.
        let events = vec![
            chip(0, 0.0),
            bumper(0, 100.0),
            bumper(0, 200.0),
            chip(0, 250.0),
        ];
        let notes = transform(&events).unwrap();
        assert_eq!(bumper_offsets(&notes, 1..3), vec![LANE1, LANE1]);

        // All gaps equal: the tail gap wins and nothing is flipped.
        let events = vec![
            chip(0, 0.0),
            bumper(0, 100.0),
            bumper(0, 200.0),
            chip(0, 300.0),
        ];
        let notes = transform(&events).unwrap();
        assert_eq!(bumper_offsets(&notes, 1..3), vec![LANE1, LANE0]);
    }

    #[test]
    fn head_tie_prefers_lone_chip() {
        // Lane 0 hold releases at the same time the lane 1 chip is hit.
        let events = vec![hold(0, 0.0, 100), chip(1, 100.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();

        assert_eq!(notes[2].lane_offset, LANE0);
    }

    #[test]
    fn head_tie_between_chips_is_undetermined() {
        let events = vec![chip(0, 100.0), chip(1, 100.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();

        // Falls back to zone A's default lane.
        assert_eq!(notes[2].lane_offset, LANE1);

        // With a tail on lane 0 the chain starts on lane 1 from the tail alone.
        let events = vec![
            chip(0, 100.0),
            chip(1, 100.0),
            bumper(0, 200.0),
            bumper(0, 300.0),
            chip(0, 400.0),
        ];
        let notes = transform(&events).unwrap();
        assert_eq!(bumper_offsets(&notes, 2..4), vec![LANE1, LANE0]);
    }

    #[test]
    fn head_tie_without_chips_takes_first_lane() {
        // Both holds release together, so lane 0 is the head.
        let events = vec![hold(0, 0.0, 100), hold(1, 0.0, 100), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();
        assert_eq!(notes[2].lane_offset, LANE1);

        // File order does not matter, only the lane.
        let events = vec![raw(6, 1, 100.0), raw(6, 0, 100.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();
        assert_eq!(notes[2].lane_offset, LANE1);
    }

    #[test]
    fn head_prefers_later_release() {
        let events = vec![chip(0, 100.0), chip(1, 150.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();

        assert_eq!(notes[2].lane_offset, LANE0);
    }

    #[test]
    fn bumper_mine_anchors_neighbouring_chains() {
        let events = vec![bumper(0, 100.0), raw(7, 0, 150.0), bumper(0, 200.0)];
        let notes = transform(&events).unwrap();

        // First chain: nothing around it but the bumper mine tail on lane 0.
        assert_eq!(notes[0].lane_offset, LANE1);
        // Second chain: the bumper mine on lane 0 is the head.
        assert_eq!(notes[2].lane_offset, LANE1);
    }

    #[test]
    fn zone_b_defaults() {
        let notes = transform(&[bumper(2, 0.0)]).unwrap();
        assert_eq!(notes[0].lane_offset, 185.0);

        let notes = transform(&[bumper(2, 0.0), bumper(2, 10.0), bumper(2, 20.0)]).unwrap();
        assert_eq!(offsets(&notes), vec![185.0, 355.0, 185.0]);
    }

    #[test]
    fn tail_takes_first_of_simultaneous_notes() {
        // No head, so the tail alone sets the chain's lane. Swapping the file
        // order of the two simultaneous tail chips changes the result.
        let events = vec![bumper(0, 100.0), chip(1, 500.0), chip(0, 500.0)];
        let notes = transform(&events).unwrap();
        assert_eq!(notes[0].lane_offset, LANE0);

        let events = vec![bumper(0, 100.0), chip(0, 500.0), chip(1, 500.0)];
        let notes = transform(&events).unwrap();
        assert_eq!(notes[0].lane_offset, LANE1);
    }

    #[test]
    fn widest_gap_positions() {
        let members = [t(100), t(200), t(700)];
        assert_eq!(widest_gap(Some(t(0)), &members, Some(t(800))), Some(2));
        assert_eq!(widest_gap(Some(t(-1000)), &members, Some(t(800))), Some(0));
        assert_eq!(widest_gap(None, &members, Some(t(5000))), Some(3));
        assert_eq!(widest_gap(None, &[t(100)], None), None);
        assert_eq!(widest_gap(None, &[], Some(t(0))), None);
    }

    #[test]
    fn alternation_and_tendency() {
        assert_eq!(alternate(Zone::A, 1, 4), vec![1, 0, 1, 0]);
        assert_eq!(alternate(Zone::B, 2, 3), vec![2, 3, 2]);
        assert_eq!(tendency(Zone::A, 0), Some(1));
        assert_eq!(tendency(Zone::B, 3), Some(2));
        assert_eq!(tendency(Zone::B, 0), None);
    }
}
