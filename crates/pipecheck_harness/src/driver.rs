//! The tick loop.
//!
//! [`CycleDriver`] owns the simulation context and the module-under-test.
//! Each call to [`step`](CycleDriver::step) advances time by one tick,
//! applies stimulus, evaluates the model, delivers value-change
//! notifications and, on the falling clock edge after reset has been
//! released, checks the probed output against the input.

use std::io::Write;

use pipecheck_sim::{
    Model, SignalTable, SimContext, SimTime, ValueCallbacks, ValueChangeSink, VcdRecorder,
};
use serde::Serialize;

use crate::checker::{InvariantChecker, InvariantViolation};
use crate::error::HarnessError;
use crate::probe::{display_name, Handle, SignalProbe};
use crate::stimulus::{ResetWindow, StimulusGenerator};

/// Exit status of a run without violations.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status of a run that observed an invariant violation.
pub const EXIT_VIOLATION: i32 = 1;

/// Exit status of a run aborted by a [`HarnessError`].
pub const EXIT_FATAL: i32 = 2;

/// Parameters of a harness run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of ticks to simulate.
    pub ticks: u64,
    /// Reset assertion window.
    pub reset: ResetWindow,
    /// Hierarchical path of the probed output.
    pub probe_path: String,
    /// Initial data input level.
    pub data_init: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 20,
            reset: ResetWindow::default(),
            probe_path: "TOP.Module1.m0.o_a_b".to_string(),
            data_init: true,
        }
    }
}

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Reset has not been released yet; no samples are taken.
    WarmingUp,
    /// Reset was released; every falling clock edge is sampled.
    Started,
    /// An invariant violation was observed.
    Failed,
    /// The tick budget ran out without a violation.
    Completed,
}

impl RunState {
    /// Returns `true` for [`Failed`](RunState::Failed) and
    /// [`Completed`](RunState::Completed).
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Failed | RunState::Completed)
    }
}

/// Outcome of a finished run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Terminal state.
    pub state: RunState,
    /// Ticks actually simulated.
    pub ticks_run: u64,
    /// Number of passing samples.
    pub samples: u64,
    /// Simulation time at the end of the run.
    pub final_time: SimTime,
    /// The violation that stopped the run, if any.
    pub violation: Option<InvariantViolation>,
}

impl RunSummary {
    /// Maps the outcome to a process exit status.
    pub fn exit_code(&self) -> i32 {
        match self.state {
            RunState::Failed => EXIT_VIOLATION,
            _ => EXIT_SUCCESS,
        }
    }
}

/// Drives the module-under-test tick by tick.
pub struct CycleDriver {
    ctx: SimContext,
    model: Box<dyn Model>,
    stimulus: StimulusGenerator,
    checker: InvariantChecker,
    probe: Handle,
    callbacks: ValueCallbacks,
    ticks: u64,
    ticks_run: u64,
    samples: u64,
    state: RunState,
    violation: Option<InvariantViolation>,
}

impl CycleDriver {
    /// Creates a driver for `model`.
    ///
    /// The probe path is resolved here, before any tick runs, so a wiring
    /// mismatch aborts the run before the first sample. Clock and reset start
    /// low and the data input starts at `config.data_init`.
    pub fn new(mut model: Box<dyn Model>, config: &RunConfig) -> Result<Self, HarnessError> {
        let probe = model.signals().resolve(&config.probe_path)?;
        let stimulus = StimulusGenerator::new(config.reset, config.data_init);

        model.poke_reset(stimulus.reset());
        model.poke_clock(stimulus.clock());
        model.poke_data(stimulus.data());

        let checker = InvariantChecker::new(
            display_name(model.data_port_name()),
            display_name(&config.probe_path),
        );

        tracing::info!(
            model = model.instance_name(),
            probe = %config.probe_path,
            ticks = config.ticks,
            reset_start = config.reset.start,
            reset_end = config.reset.end,
            "harness ready"
        );

        Ok(Self {
            ctx: SimContext::new(),
            model,
            stimulus,
            checker,
            probe,
            callbacks: ValueCallbacks::new(),
            ticks: config.ticks,
            ticks_run: 0,
            samples: 0,
            state: RunState::WarmingUp,
            violation: None,
        })
    }

    /// Returns the current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns the current simulation time.
    pub fn time(&self) -> SimTime {
        self.ctx.time()
    }

    /// Returns the number of passing samples so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Returns the module-under-test.
    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// Returns the module's signal table.
    pub fn signals(&self) -> &SignalTable {
        self.model.signals()
    }

    /// Watches every signal of the module and registers `sink` for their changes.
    pub fn add_sink(&mut self, sink: Box<dyn ValueChangeSink>) {
        self.callbacks.watch_all(self.model.signals());
        self.callbacks.add_sink(sink);
    }

    /// Records every module signal as VCD into `writer`.
    pub fn record_waveform<W: Write + 'static>(&mut self, writer: W) -> Result<(), HarnessError> {
        let recorder = VcdRecorder::for_table(writer, self.model.signals())?;
        self.add_sink(Box::new(recorder));
        Ok(())
    }

    /// Runs one tick and returns the resulting state.
    ///
    /// Passing samples and the violation diagnostic are written to `out`,
    /// one line each. Once the budget is spent the next call returns
    /// [`RunState::Completed`]; terminal states are sticky.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<RunState, HarnessError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        if self.ticks_run >= self.ticks {
            self.state = RunState::Completed;
            return Ok(self.state);
        }

        if self.ctx.time() == SimTime::zero() {
            self.callbacks
                .call_value_cbs(self.model.signals(), SimTime::zero())?;
        }

        self.ctx.time_inc(1);
        let time = self.ctx.time();
        self.ticks_run += 1;

        let stim = self.stimulus.next(time);
        self.model.poke_clock(stim.clock);
        if stim.low_phase {
            self.model.poke_reset(stim.reset);
            self.model.poke_data(stim.data);
            if !stim.reset && self.state == RunState::WarmingUp {
                tracing::info!(%time, "reset released");
                self.state = RunState::Started;
            }
        }
        tracing::debug!(
            %time,
            clock = stim.clock,
            reset = stim.reset,
            data = stim.data,
            "tick"
        );

        self.model.eval();
        self.callbacks.call_value_cbs(self.model.signals(), time)?;

        if self.state == RunState::Started && stim.low_phase {
            let input = i64::from(self.model.data());
            let output = self.model.signals().read_int(self.probe)?;
            match self.checker.check(time, input, output) {
                Ok(sample) => {
                    writeln!(out, "{sample}")?;
                    self.samples += 1;
                }
                Err(violation) => {
                    writeln!(out, "{violation}")?;
                    self.violation = Some(violation);
                    self.state = RunState::Failed;
                }
            }
        }

        Ok(self.state)
    }

    /// Runs until the budget is spent or a violation stops the run.
    ///
    /// The model is finalized and sinks are flushed on both outcomes.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunSummary, HarnessError> {
        loop {
            if self.step(out)?.is_terminal() {
                break;
            }
        }
        self.finish()?;

        tracing::info!(
            state = ?self.state,
            ticks = self.ticks_run,
            samples = self.samples,
            "run finished"
        );

        Ok(self.summary())
    }

    /// Returns a summary of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            state: self.state,
            ticks_run: self.ticks_run,
            samples: self.samples,
            final_time: self.ctx.time(),
            violation: self.violation.clone(),
        }
    }

    fn finish(&mut self) -> Result<(), HarnessError> {
        if self.model.is_finalized() {
            return Ok(());
        }
        self.model.finalize();
        self.callbacks.finish()?;
        Ok(())
    }
}
