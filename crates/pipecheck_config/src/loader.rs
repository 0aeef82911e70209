//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::HarnessConfig;
use std::path::Path;

/// Conventional configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pipecheck.toml";

/// Loads and validates a harness configuration file.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a harness configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<HarnessConfig, ConfigError> {
    let config: HarnessConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are present and consistent.
pub fn validate_config(config: &HarnessConfig) -> Result<(), ConfigError> {
    if config.probe.path.trim().is_empty() {
        return Err(ConfigError::MissingField("probe.path"));
    }
    if config.reset.start >= config.reset.end {
        return Err(ConfigError::EmptyResetWindow {
            start: config.reset.start,
            end: config.reset.end,
        });
    }
    if matches!(&config.waveform.path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::MissingField("waveform.path"));
    }
    Ok(())
}
