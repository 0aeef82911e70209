//! One-cycle-delay invariant check.
//!
//! At every sample point the probed output must still hold the previous
//! cycle's input. With a toggling single-bit input that means the output
//! must differ from the input currently applied. The check looks at one
//! pair at a time and keeps no history.

use std::fmt;

use pipecheck_sim::SimTime;
use serde::Serialize;

/// A passing sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// When the sample was taken.
    pub time: SimTime,
    /// Display name of the input signal.
    pub input_name: String,
    /// Value of the input signal.
    pub input: i64,
    /// Display name of the output signal.
    pub output_name: String,
    /// Value of the output signal.
    pub output: i64,
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} {}={}",
            self.input_name, self.input, self.output_name, self.output
        )
    }
}

/// The output matched the current input instead of the previous one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{output_name} should be the old value of {input_name}")]
pub struct InvariantViolation {
    /// When the violation was observed.
    pub time: SimTime,
    /// Display name of the input signal.
    pub input_name: String,
    /// Value of the input signal.
    pub input: i64,
    /// Display name of the output signal.
    pub output_name: String,
    /// Value of the output signal.
    pub output: i64,
}

/// Checks `output != input` for each sampled pair.
#[derive(Clone, Debug)]
pub struct InvariantChecker {
    input_name: String,
    output_name: String,
}

impl InvariantChecker {
    /// Creates a checker that labels its reports with the given names.
    pub fn new(input_name: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            input_name: input_name.into(),
            output_name: output_name.into(),
        }
    }

    /// Checks one sampled pair.
    pub fn check(
        &self,
        time: SimTime,
        input: i64,
        output: i64,
    ) -> Result<Sample, InvariantViolation> {
        if input == output {
            tracing::warn!(%time, input, output, "one-cycle delay violated");
            return Err(InvariantViolation {
                time,
                input_name: self.input_name.clone(),
                input,
                output_name: self.output_name.clone(),
                output,
            });
        }
        tracing::trace!(%time, input, output, "sample ok");
        Ok(Sample {
            time,
            input_name: self.input_name.clone(),
            input,
            output_name: self.output_name.clone(),
            output,
        })
    }
}
