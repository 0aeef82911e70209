//! Parsing and validation of `pipecheck.toml` harness configuration files.
//!
//! This crate reads the optional configuration file and produces a
//! strongly-typed [`HarnessConfig`]. Every field has a default, so an empty
//! file (or no file at all) describes the reference run: 20 ticks, reset
//! held between ticks 1 and 10, probing `TOP.Module1.m0.o_a_b`.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
