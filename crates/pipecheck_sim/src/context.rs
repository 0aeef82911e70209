//! Simulation context owning the current time.

use crate::time::SimTime;

/// Owns the simulated clock of a run.
///
/// Time only moves forward through [`time_inc`](SimContext::time_inc); there
/// is no way to rewind or reset it once a run has started.
#[derive(Debug, Default)]
pub struct SimContext {
    time: SimTime,
}

impl SimContext {
    /// Creates a context at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Advances simulation time by `delta` ticks.
    pub fn time_inc(&mut self, delta: u64) {
        self.time = self.time.advance(delta);
    }
}
