//! Error types for configuration loading and validation.

use std::io;
use std::path::PathBuf;

/// Errors that can occur when loading or validating a `pipecheck.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },

    /// The TOML content could not be parsed into a [`HarnessConfig`](crate::HarnessConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The reset window does not release reset after asserting it.
    ///
    /// Reset is held on ticks strictly between `start` and `end`, so the
    /// window must satisfy `start < end`.
    #[error("reset.start ({start}) must be below reset.end ({end})")]
    EmptyResetWindow {
        /// Exclusive lower bound, in ticks.
        start: u64,
        /// Exclusive upper bound, in ticks.
        end: u64,
    },
}
