// -----------------------------------------------------------------------------
// Hardcoded positionX mapping for the target judge line.
//
// Rules encoded:
// - the four physical lanes sit at fixed offsets, two per zone.
// - bumper mines sit at the centre of their zone (-270 / 270).
// - a resolved bumper sits 85 units from its zone centre, towards the
//   physical lane it was assigned to.
// -----------------------------------------------------------------------------

pub const LANE_OFFSETS: &[(u8, f64)] = &[(0, -405.0), (1, -135.0), (2, 135.0), (3, 405.0)];

/// Keyed by the zone's first lane, which is how bumper mines encode their zone.
pub const ZONE_CENTRE_OFFSETS: &[(u8, f64)] = &[(0, -270.0), (2, 270.0)];

pub const BUMPER_SHIFT: f64 = 85.0;

/// Return the positionX for a chip, hold or mine on the given lane, if present.
pub fn offset_for_lane(lane: u8) -> Option<f64> {
    LANE_OFFSETS
        .iter()
        .find(|(l, _)| *l == lane)
        .map(|(_, offset)| *offset)
}

/// Return the positionX for the centre of the zone whose first lane is `base_lane`.
pub fn offset_for_zone(base_lane: u8) -> Option<f64> {
    ZONE_CENTRE_OFFSETS
        .iter()
        .find(|(l, _)| *l == base_lane)
        .map(|(_, offset)| *offset)
}

/// positionX of a bumper assigned to `lane` in the zone starting at `base_lane`.
///
/// The zone's first lane shifts left of centre, its second lane right.
pub fn bumper_offset(base_lane: u8, lane: u8) -> f64 {
    let centre = offset_for_zone(base_lane).unwrap_or(0.0);
    if lane == base_lane {
        centre - BUMPER_SHIFT
    } else {
        centre + BUMPER_SHIFT
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lane_table() {
        assert_eq!(offset_for_lane(0), Some(-405.0));
        assert_eq!(offset_for_lane(3), Some(405.0));
        assert_eq!(offset_for_lane(4), None);
    }

    #[test]
    fn bumper_positions_straddle_zone_centre() {
        assert_eq!(bumper_offset(0, 0), -355.0);
        assert_eq!(bumper_offset(0, 1), -185.0);
        assert_eq!(bumper_offset(2, 2), 185.0);
        assert_eq!(bumper_offset(2, 3), 355.0);
        assert_eq!(offset_for_zone(1), None);
    }
}
