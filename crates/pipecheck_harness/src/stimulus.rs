//! Clock, reset and data stimulus.
//!
//! The clock toggles on every tick, so one full period spans two ticks and
//! the clock is low at tick 0. Reset and data are only updated when the clock
//! falls:
//!
//! ```text
//! tick   0 1 2 3 4 5 6 7 8 9 10 11 12
//! clock  0 1 0 1 0 1 0 1 0 1 0  1  0
//! reset  0 0 1 1 1 1 1 1 1 1 0  0  0     (window 1 < t < 10)
//! data   1 1 0 0 1 1 0 0 1 1 0  0  1     (data_init = 1)
//! ```

use pipecheck_sim::SimTime;
use serde::Serialize;

/// Reset is asserted while `start < time < end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResetWindow {
    /// Exclusive lower bound, in ticks.
    pub start: u64,
    /// Exclusive upper bound, in ticks.
    pub end: u64,
}

impl ResetWindow {
    /// Creates a window with exclusive bounds.
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Returns `true` if reset is asserted at `time`.
    pub fn contains(&self, time: SimTime) -> bool {
        self.start < time.ticks && time.ticks < self.end
    }
}

impl Default for ResetWindow {
    fn default() -> Self {
        Self { start: 1, end: 10 }
    }
}

/// Port values produced for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stimulus {
    /// Clock level after this tick's toggle.
    pub clock: bool,
    /// `true` when the clock just fell; reset and data were recomputed.
    pub low_phase: bool,
    /// Reset level.
    pub reset: bool,
    /// Data input level.
    pub data: bool,
}

/// Produces the clock, reset and data sequence tick by tick.
#[derive(Clone, Debug)]
pub struct StimulusGenerator {
    window: ResetWindow,
    clock: bool,
    reset: bool,
    data: bool,
}

impl StimulusGenerator {
    /// Creates a generator with the clock low, reset deasserted and the data
    /// input at `data_init`.
    pub fn new(window: ResetWindow, data_init: bool) -> Self {
        Self {
            window,
            clock: false,
            reset: false,
            data: data_init,
        }
    }

    /// Returns the current clock level.
    pub fn clock(&self) -> bool {
        self.clock
    }

    /// Returns the current reset level.
    pub fn reset(&self) -> bool {
        self.reset
    }

    /// Returns the current data level.
    pub fn data(&self) -> bool {
        self.data
    }

    /// Returns the reset window.
    pub fn window(&self) -> ResetWindow {
        self.window
    }

    /// Advances to `time`: toggles the clock and, if it fell, recomputes reset
    /// and flips the data bit.
    pub fn next(&mut self, time: SimTime) -> Stimulus {
        self.clock = !self.clock;
        let low_phase = !self.clock;
        if low_phase {
            self.reset = self.window.contains(time);
            self.data = !self.data;
        }
        Stimulus {
            clock: self.clock,
            low_phase,
            reset: self.reset,
            data: self.data,
        }
    }
}
