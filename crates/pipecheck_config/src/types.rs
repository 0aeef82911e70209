//! Configuration types deserialized from `pipecheck.toml`.

use pipecheck_sim::DesignKind;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Tick budget of the reference run.
pub const DEFAULT_TICKS: u64 = 20;

/// Exclusive lower bound of the reference reset window.
pub const DEFAULT_RESET_START: u64 = 1;

/// Exclusive upper bound of the reference reset window.
pub const DEFAULT_RESET_END: u64 = 10;

/// Hierarchical path probed by the reference run.
pub const DEFAULT_PROBE_PATH: &str = "TOP.Module1.m0.o_a_b";

/// The top-level harness configuration parsed from `pipecheck.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct HarnessConfig {
    /// Tick budget and design selection.
    #[serde(default)]
    pub run: RunSection,
    /// Reset window bounds.
    #[serde(default)]
    pub reset: ResetSection,
    /// Output probe settings.
    #[serde(default)]
    pub probe: ProbeSection,
    /// Input stimulus settings.
    #[serde(default)]
    pub stimulus: StimulusSection,
    /// Waveform dump settings.
    #[serde(default)]
    pub waveform: WaveformSection,
}

/// The `[run]` table.
#[derive(Debug, Deserialize)]
pub struct RunSection {
    /// Number of ticks (half clock periods) to simulate.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Which bundled module-under-test to instantiate.
    #[serde(default)]
    pub design: DesignKind,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            design: DesignKind::default(),
        }
    }
}

/// The `[reset]` table. Reset is asserted while `start < time < end`.
#[derive(Debug, Deserialize)]
pub struct ResetSection {
    /// Exclusive lower bound, in ticks.
    #[serde(default = "default_reset_start")]
    pub start: u64,
    /// Exclusive upper bound, in ticks.
    #[serde(default = "default_reset_end")]
    pub end: u64,
}

impl Default for ResetSection {
    fn default() -> Self {
        Self {
            start: DEFAULT_RESET_START,
            end: DEFAULT_RESET_END,
        }
    }
}

/// The `[probe]` table.
#[derive(Debug, Deserialize)]
pub struct ProbeSection {
    /// Full hierarchical path of the output signal.
    #[serde(default = "default_probe_path")]
    pub path: String,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            path: DEFAULT_PROBE_PATH.to_string(),
        }
    }
}

/// The `[stimulus]` table.
#[derive(Debug, Deserialize)]
pub struct StimulusSection {
    /// Initial value of the data input.
    ///
    /// Accepts `0`/`1` or `false`/`true`.
    #[serde(default = "default_data_init", deserialize_with = "deserialize_bit")]
    pub data_init: bool,
}

impl Default for StimulusSection {
    fn default() -> Self {
        Self {
            data_init: default_data_init(),
        }
    }
}

/// The `[waveform]` table.
#[derive(Debug, Default, Deserialize)]
pub struct WaveformSection {
    /// Path of the VCD file to write. No waveform is recorded when absent.
    pub path: Option<String>,
}

fn default_ticks() -> u64 {
    DEFAULT_TICKS
}

fn default_reset_start() -> u64 {
    DEFAULT_RESET_START
}

fn default_reset_end() -> u64 {
    DEFAULT_RESET_END
}

fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}

fn default_data_init() -> bool {
    true
}

/// Deserializes a single bit written either as an integer or a boolean.
///
/// Allows `data_init = 1` as well as `data_init = true`. Integers other than
/// 0 and 1 are rejected.
fn deserialize_bit<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BitVisitor;

    impl<'de> Visitor<'de> for BitVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("0, 1, true or false")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
            }
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(BitVisitor)
}
