//! Simulation time as a monotonic tick counter.
//!
//! [`SimTime`] counts half clock periods. The harness advances it by exactly
//! one tick per clock toggle, so a full clock period spans two ticks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulation time point measured in ticks.
///
/// Ticks only move forward; [`SimTime::advance`] is the sole way to produce a
/// later time from an earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime {
    /// Elapsed ticks since the start of the run.
    pub ticks: u64,
}

impl SimTime {
    /// Creates a time point at tick zero.
    pub fn zero() -> Self {
        Self { ticks: 0 }
    }

    /// Creates a time point at the given tick.
    pub fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Returns the time `delta` ticks later.
    pub fn advance(&self, delta: u64) -> Self {
        Self {
            ticks: self.ticks + delta,
        }
    }
}

impl Default for SimTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_time() {
        assert_eq!(SimTime::zero().ticks, 0);
    }

    #[test]
    fn advance_moves_forward() {
        let t = SimTime::from_ticks(4);
        assert_eq!(t.advance(1).ticks, 5);
        assert_eq!(t.advance(0), t);
    }

    #[test]
    fn ordering() {
        assert!(SimTime::from_ticks(1) < SimTime::from_ticks(2));
    }

    #[test]
    fn display() {
        assert_eq!(SimTime::from_ticks(10).to_string(), "10 ticks");
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(SimTime::default(), SimTime::zero());
    }

    #[test]
    fn serde_roundtrip() {
        let t = SimTime::from_ticks(12345);
        let json = serde_json::to_string(&t).unwrap();
        let back: SimTime = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
