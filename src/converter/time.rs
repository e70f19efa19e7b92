use crate::model::note::TimeTriple;
use std::fmt;

/// Milliseconds of lead-in added to every converted time.
pub const LEAD_IN_MS: i64 = 1000;
const MS_PER_SECOND: i64 = 1000;

/// An exact chart time, stored as whole milliseconds including the lead-in.
///
/// This is a rational number of seconds with a fixed denominator of 1000,
/// so comparisons and gap arithmetic never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartTime(i64);

impl ChartTime {
    /// Convert a raw millisecond value, truncating toward zero first.
    pub fn from_raw_ms(ms: f32) -> Self {
        Self::from_whole_ms(ms as i64)
    }

    pub fn from_whole_ms(ms: i64) -> Self {
        Self(ms.saturating_add(LEAD_IN_MS))
    }

    /// Total milliseconds, lead-in included.
    pub fn millis(self) -> i64 {
        self.0
    }

    /// Signed distance from `earlier` to `self`, in milliseconds.
    pub fn since(self, earlier: ChartTime) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `[whole, numerator, denominator]` with the fraction in lowest terms.
    ///
    /// `whole` is the floor of the time in seconds, so the numerator is never
    /// negative and the denominator always divides 1000.
    pub fn to_triple(self) -> TimeTriple {
        let divisor = gcd(self.0.unsigned_abs(), MS_PER_SECOND as u64) as i64;
        let numerator = self.0 / divisor;
        let denominator = MS_PER_SECOND / divisor;
        TimeTriple(
            numerator.div_euclid(denominator),
            numerator.rem_euclid(denominator),
            denominator,
        )
    }
}

impl fmt::Display for ChartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0 as f64 / MS_PER_SECOND as f64)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
