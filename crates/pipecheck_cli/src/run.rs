//! The harness run behind the `pipecheck` binary.
//!
//! Loads `pipecheck.toml` (explicit path, else the working directory, else
//! built-in defaults), applies command-line overrides, drives the selected
//! design and reports the summary.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use pipecheck_config::{load_config, validate_config, HarnessConfig, CONFIG_FILE_NAME};
use pipecheck_harness::{CycleDriver, ResetWindow, RunConfig, RunState, RunSummary};

use crate::{Cli, SummaryFormat};

/// Runs the harness and returns the process exit code.
pub fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = resolve_config(cli, &cwd)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = execute(&config, &mut out)?;

    match cli.summary {
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &summary)?;
            writeln!(out)?;
        }
        SummaryFormat::Text => {
            if !cli.quiet {
                eprint!(
                    "{}",
                    format_summary(&summary, config.waveform.path.as_deref())
                );
            }
        }
    }
    out.flush()?;

    Ok(summary.exit_code())
}

/// Loads the configuration file and applies command-line overrides.
fn resolve_config(cli: &Cli, cwd: &Path) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    let mut config = match config_path(cli, cwd) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load_config(&path)?
        }
        None => HarnessConfig::default(),
    };

    if let Some(ticks) = cli.ticks {
        config.run.ticks = ticks;
    }
    if let Some(design) = cli.design {
        config.run.design = design.into();
    }
    if let Some(start) = cli.reset_start {
        config.reset.start = start;
    }
    if let Some(end) = cli.reset_end {
        config.reset.end = end;
    }
    if let Some(ref probe) = cli.probe {
        config.probe.path = probe.clone();
    }
    if let Some(bit) = cli.data_init {
        config.stimulus.data_init = bit != 0;
    }
    if let Some(ref vcd) = cli.vcd {
        config.waveform.path = Some(vcd.clone());
    }

    validate_config(&config)?;
    Ok(config)
}

/// Returns the configuration file to load, if any.
///
/// An explicit `--config` path is always returned so a missing file is an
/// error; the working-directory file is only used when it exists.
fn config_path(cli: &Cli, cwd: &Path) -> Option<PathBuf> {
    if let Some(ref explicit) = cli.config {
        return Some(PathBuf::from(explicit));
    }
    let local = cwd.join(CONFIG_FILE_NAME);
    local.is_file().then_some(local)
}

/// Builds the design, runs it to a terminal state and returns the summary.
fn execute<W: Write>(
    config: &HarnessConfig,
    out: &mut W,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let run_config = RunConfig {
        ticks: config.run.ticks,
        reset: ResetWindow::new(config.reset.start, config.reset.end),
        probe_path: config.probe.path.clone(),
        data_init: config.stimulus.data_init,
    };

    let model = config.run.design.build()?;
    let mut driver = CycleDriver::new(model, &run_config)?;

    if let Some(ref path) = config.waveform.path {
        let path = Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        driver.record_waveform(BufWriter::new(File::create(path)?))?;
    }

    Ok(driver.run(out)?)
}

fn format_summary(summary: &RunSummary, waveform: Option<&str>) -> String {
    let mut text = match (&summary.state, &summary.violation) {
        (RunState::Failed, Some(v)) => format!(
            "   FAILED at {}: {}={} {}={}\n",
            v.time, v.input_name, v.input, v.output_name, v.output
        ),
        _ => format!(
            "   Completed {} ({} samples)\n",
            summary.final_time, summary.samples
        ),
    };
    if let Some(path) = waveform {
        text.push_str(&format!("   Waveform: {path}\n"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pipecheck_harness::{EXIT_SUCCESS, EXIT_VIOLATION};
    use pipecheck_sim::DesignKind;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pipecheck").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(&cli(&[]), dir.path()).unwrap();
        assert_eq!(config.run.ticks, 20);
        assert_eq!(config.run.design, DesignKind::Delay);
        assert_eq!(config.reset.start, 1);
        assert_eq!(config.reset.end, 10);
        assert!(config.stimulus.data_init);
        assert!(config.waveform.path.is_none());
    }

    #[test]
    fn working_directory_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[run]\nticks = 30\ndesign = \"passthrough\"\n",
        )
        .unwrap();
        let config = resolve_config(&cli(&[]), dir.path()).unwrap();
        assert_eq!(config.run.ticks, 30);
        assert_eq!(config.run.design, DesignKind::Passthrough);
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[run]\nticks = 30\n[stimulus]\ndata_init = 1\n",
        )
        .unwrap();
        let args = cli(&["--ticks", "12", "--data-init", "0"]);
        let config = resolve_config(&args, dir.path()).unwrap();
        assert_eq!(config.run.ticks, 12);
        assert!(!config.stimulus.data_init);
        assert_eq!(config.run.design, DesignKind::Delay);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let args = cli(&["--config", missing.to_str().unwrap()]);
        assert!(resolve_config(&args, dir.path()).is_err());
    }

    #[test]
    fn inverted_reset_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(&["--reset-start", "9", "--reset-end", "3"]);
        let err = resolve_config(&args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("reset.start"), "{err}");
    }

    #[test]
    fn execute_delay_completes() {
        let mut out = Vec::new();
        let summary = execute(&HarnessConfig::default(), &mut out).unwrap();
        assert_eq!(summary.exit_code(), EXIT_SUCCESS);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("Module1.i_a_b=0 Module1.m0.o_a_b=1\n"));
    }

    #[test]
    fn execute_passthrough_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(&cli(&["--design", "passthrough"]), dir.path()).unwrap();
        let mut out = Vec::new();
        let summary = execute(&config, &mut out).unwrap();
        assert_eq!(summary.exit_code(), EXIT_VIOLATION);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Module1.m0.o_a_b should be the old value of Module1.i_a_b\n"
        );
    }

    #[test]
    fn execute_unresolved_probe_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(&cli(&["--probe", "TOP.Module1.m0.q"]), dir.path()).unwrap();
        let mut out = Vec::new();
        let err = execute(&config, &mut out).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no handle found for 'TOP.Module1.m0.q'"));
        assert!(out.is_empty());
    }

    #[test]
    fn execute_writes_waveform() {
        let dir = tempfile::tempdir().unwrap();
        let vcd = dir.path().join("out").join("run.vcd");
        let args = cli(&["--vcd", vcd.to_str().unwrap()]);
        let config = resolve_config(&args, dir.path()).unwrap();
        execute(&config, &mut Vec::new()).unwrap();
        let text = std::fs::read_to_string(&vcd).unwrap();
        assert!(text.contains("$enddefinitions $end"));
        assert!(text.contains("o_a_b"));
    }

    #[test]
    fn summary_text() {
        let mut out = Vec::new();
        let summary = execute(&HarnessConfig::default(), &mut out).unwrap();
        assert_eq!(
            format_summary(&summary, Some("out/run.vcd")),
            "   Completed 20 ticks (6 samples)\n   Waveform: out/run.vcd\n"
        );
    }

    #[test]
    fn summary_text_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = resolve_config(&cli(&["--design", "passthrough"]), dir.path()).unwrap();
        let summary = execute(&config, &mut Vec::new()).unwrap();
        assert_eq!(
            format_summary(&summary, None),
            "   FAILED at 10 ticks: Module1.i_a_b=0 Module1.m0.o_a_b=0\n"
        );
    }
}
