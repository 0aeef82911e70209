//! Cycle-driven verification of a one-cycle delay.
//!
//! The harness drives a [`Model`](pipecheck_sim::Model) with a toggling
//! clock, a reset pulse and an alternating data bit, then checks on every
//! falling edge after reset that the probed output still holds the previous
//! cycle's input.
//!
//! # Usage
//!
//! ```ignore
//! use pipecheck_harness::{CycleDriver, RunConfig};
//! use pipecheck_sim::DesignKind;
//!
//! let mut driver = CycleDriver::new(DesignKind::Delay.build()?, &RunConfig::default())?;
//! let summary = driver.run(&mut std::io::stdout().lock())?;
//! std::process::exit(summary.exit_code());
//! ```
//!
//! # Modules
//!
//! - `error`: Fatal harness errors
//! - `probe`: Signal lookup by hierarchical path
//! - `stimulus`: Clock, reset and data generation
//! - `checker`: The one-cycle-delay check
//! - `driver`: The tick loop and run lifecycle

#![warn(missing_docs)]

pub mod checker;
pub mod driver;
pub mod error;
pub mod probe;
pub mod stimulus;

pub use checker::{InvariantChecker, InvariantViolation, Sample};
pub use driver::{
    CycleDriver, RunConfig, RunState, RunSummary, EXIT_FATAL, EXIT_SUCCESS, EXIT_VIOLATION,
};
pub use error::HarnessError;
pub use probe::{display_name, Handle, SignalProbe};
pub use stimulus::{ResetWindow, Stimulus, StimulusGenerator};
