//! Simulation error types.
//!
//! All errors raised while building or running a simulated model are
//! variants of [`SimError`].

use std::io;

/// Errors that can occur during model construction or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Two signals were registered under the same hierarchical name.
    #[error("duplicate signal name '{0}'")]
    DuplicateSignal(String),

    /// A value does not fit in the signal's bit width.
    #[error("value {value} does not fit in {width}-bit signal '{name}'")]
    ValueOutOfRange {
        /// Hierarchical name of the target signal.
        name: String,
        /// Declared bit width.
        width: u32,
        /// The rejected value.
        value: u64,
    },

    /// A signal ID does not belong to this table.
    #[error("invalid signal reference: {reason}")]
    InvalidSignalRef {
        /// Description of why the reference is invalid.
        reason: String,
    },

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_signal_display() {
        let e = SimError::DuplicateSignal("TOP.Module1.clock".into());
        assert_eq!(e.to_string(), "duplicate signal name 'TOP.Module1.clock'");
    }

    #[test]
    fn value_out_of_range_display() {
        let e = SimError::ValueOutOfRange {
            name: "TOP.Module1.i_a_b".into(),
            width: 1,
            value: 2,
        };
        assert_eq!(
            e.to_string(),
            "value 2 does not fit in 1-bit signal 'TOP.Module1.i_a_b'"
        );
    }

    #[test]
    fn invalid_signal_ref_display() {
        let e = SimError::InvalidSignalRef {
            reason: "unregistered VCD signal 3".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid signal reference: unregistered VCD signal 3"
        );
    }

    #[test]
    fn waveform_io_display() {
        let e = SimError::WaveformIo(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(e.to_string().contains("waveform I/O error"));
    }
}
