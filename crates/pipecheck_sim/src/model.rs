//! The module-under-test interface.
//!
//! A [`Model`] is a compiled hardware module driven through its input ports.
//! The harness writes the clock, reset and data inputs, calls
//! [`eval`](Model::eval) to propagate them, and observes internal signals
//! through the model's [`SignalTable`].

use crate::value::SignalTable;

/// A simulated hardware module with a clock, a reset and one data input.
pub trait Model {
    /// Returns the hierarchical name of the module instance (e.g. `TOP.Module1`).
    fn instance_name(&self) -> &str;

    /// Drives the clock input port.
    fn poke_clock(&mut self, level: bool);

    /// Drives the reset input port.
    fn poke_reset(&mut self, level: bool);

    /// Drives the data input port.
    fn poke_data(&mut self, bit: bool);

    /// Returns the value currently applied to the data input port.
    fn data(&self) -> bool;

    /// Returns the hierarchical name of the data input port.
    fn data_port_name(&self) -> &str;

    /// Propagates the current inputs through the module's logic.
    fn eval(&mut self);

    /// Runs end-of-simulation teardown. Called at most once per run.
    fn finalize(&mut self);

    /// Returns `true` once [`finalize`](Model::finalize) has run.
    fn is_finalized(&self) -> bool;

    /// Returns the table holding every signal of the module.
    fn signals(&self) -> &SignalTable;
}
