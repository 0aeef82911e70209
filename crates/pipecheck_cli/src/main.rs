//! pipecheck: drive a simulated module through reset and check that its
//! output lags its input by exactly one clock cycle.
//!
//! Sample lines and the violation diagnostic go to stdout; logging and the
//! run summary go to stderr. The process exits with 0 when the run
//! completes, 1 on an invariant violation and 2 on any fatal error.

#![warn(missing_docs)]

mod run;

use std::process;

use clap::{Parser, ValueEnum};
use pipecheck_harness::EXIT_FATAL;
use pipecheck_sim::DesignKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pipecheck: one-cycle-delay verification harness.
#[derive(Parser, Debug)]
#[command(
    name = "pipecheck",
    version,
    about = "One-cycle-delay verification harness"
)]
pub struct Cli {
    /// Suppress all output except errors and sample lines.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a custom `pipecheck.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Number of ticks to simulate.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Exclusive lower bound of the reset window, in ticks.
    #[arg(long)]
    pub reset_start: Option<u64>,

    /// Exclusive upper bound of the reset window, in ticks.
    #[arg(long)]
    pub reset_end: Option<u64>,

    /// Hierarchical path of the probed output (e.g. `TOP.Module1.m0.o_a_b`).
    #[arg(long)]
    pub probe: Option<String>,

    /// Module-under-test to instantiate.
    #[arg(long, value_enum)]
    pub design: Option<DesignArg>,

    /// Initial level of the data input (0 or 1).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub data_init: Option<u8>,

    /// Write a VCD waveform of all module signals to this path.
    #[arg(long)]
    pub vcd: Option<String>,

    /// Run summary format.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
}

/// Bundled module-under-test selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DesignArg {
    /// Registered one-cycle delay.
    Delay,
    /// Zero-delay passthrough; always violates.
    Passthrough,
}

impl From<DesignArg> for DesignKind {
    fn from(arg: DesignArg) -> Self {
        match arg {
            DesignArg::Delay => DesignKind::Delay,
            DesignArg::Passthrough => DesignKind::Passthrough,
        }
    }
}

/// Run summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines on stderr.
    Text,
    /// A JSON object on stdout after the sample lines.
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    process::exit(exit_status(run::run(&cli)));
}

/// Maps the outcome of a run to the process exit status.
///
/// Fatal errors are reported on stderr and map to [`EXIT_FATAL`].
fn exit_status(result: Result<i32, Box<dyn std::error::Error>>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e}");
            EXIT_FATAL
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}
