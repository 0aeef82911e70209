//! Tick-driven simulated hardware for the pipecheck harness.
//!
//! This crate is the simulation side of a harness run: it owns simulated
//! time ([`SimContext`]), models of the module-under-test behind the
//! [`Model`] trait, the flat [`SignalTable`] those models expose by
//! hierarchical name, and value-change delivery to sinks such as the
//! [`VcdRecorder`].
//!
//! # Usage
//!
//! ```ignore
//! use pipecheck_sim::{DesignKind, SimContext};
//!
//! let mut ctx = SimContext::new();
//! let mut model = DesignKind::Delay.build()?;
//! ctx.time_inc(1);
//! model.poke_clock(true);
//! model.eval();
//! ```
//!
//! # Modules
//!
//! - `error`: Simulation error types
//! - `time`: Tick-based simulation time
//! - `context`: Owner of the current time
//! - `value`: Signal table with hierarchical names
//! - `model`: Module-under-test trait
//! - `designs`: Bundled delay and passthrough modules
//! - `callbacks`: Value-change notifications
//! - `waveform`: VCD recording

#![warn(missing_docs)]

pub mod callbacks;
pub mod context;
pub mod designs;
pub mod error;
pub mod model;
pub mod time;
pub mod value;
pub mod waveform;

pub use callbacks::{ValueCallbacks, ValueChange, ValueChangeSink};
pub use context::SimContext;
pub use designs::{DelayModule, DesignKind, PassthroughModule, MODULE_INSTANCE, TOP_SCOPE};
pub use error::SimError;
pub use model::Model;
pub use time::SimTime;
pub use value::{SignalId, SignalState, SignalTable};
pub use waveform::VcdRecorder;
