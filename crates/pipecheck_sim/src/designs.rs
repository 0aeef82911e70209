//! Bundled modules-under-test.
//!
//! Both designs expose the same hierarchy so a harness can be pointed at
//! either without changing its probe paths:
//!
//! ```text
//! TOP.Module1.clock
//! TOP.Module1.reset
//! TOP.Module1.i_a_b
//! TOP.Module1.m0.clock
//! TOP.Module1.m0.i_a_b
//! TOP.Module1.m0.o_a_b
//! ```
//!
//! [`DelayModule`] registers `i_a_b` into `m0.o_a_b` on every rising clock
//! edge, so the output lags the input by one cycle. [`PassthroughModule`]
//! wires the input straight through with zero delay.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::Model;
use crate::value::{SignalId, SignalTable};

/// Name of the root scope every design is instantiated under.
pub const TOP_SCOPE: &str = "TOP";

/// Name of the module instance below [`TOP_SCOPE`].
pub const MODULE_INSTANCE: &str = "Module1";

/// Selects one of the bundled designs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignKind {
    /// One-cycle delay register.
    #[default]
    Delay,
    /// Zero-delay wire.
    Passthrough,
}

impl DesignKind {
    /// Builds a fresh instance of the selected design.
    pub fn build(self) -> Result<Box<dyn Model>, SimError> {
        Ok(match self {
            DesignKind::Delay => Box::new(DelayModule::new()?),
            DesignKind::Passthrough => Box::new(PassthroughModule::new()?),
        })
    }
}

/// Signal IDs of the shared `Module1` port layout.
#[derive(Clone, Copy, Debug)]
struct Module1Ports {
    clock: SignalId,
    reset: SignalId,
    data: SignalId,
    m0_clock: SignalId,
    m0_data: SignalId,
    m0_out: SignalId,
}

impl Module1Ports {
    /// Declares the `Module1` hierarchy in `table`.
    fn declare(table: &mut SignalTable) -> Result<Self, SimError> {
        let inst = format!("{TOP_SCOPE}.{MODULE_INSTANCE}");
        Ok(Self {
            clock: table.declare(&format!("{inst}.clock"), 1, 0)?,
            reset: table.declare(&format!("{inst}.reset"), 1, 0)?,
            data: table.declare(&format!("{inst}.i_a_b"), 1, 0)?,
            m0_clock: table.declare(&format!("{inst}.m0.clock"), 1, 0)?,
            m0_data: table.declare(&format!("{inst}.m0.i_a_b"), 1, 0)?,
            m0_out: table.declare(&format!("{inst}.m0.o_a_b"), 1, 0)?,
        })
    }

    /// Propagates the parent ports into the `m0` instance ports.
    fn bind_m0(&self, table: &mut SignalTable) {
        let clock = table.bit(self.clock);
        let data = table.bit(self.data);
        table.set_bit(self.m0_clock, clock);
        table.set_bit(self.m0_data, data);
    }
}

/// Shared port plumbing for the bundled designs.
#[derive(Debug)]
struct Module1Shell {
    instance: String,
    data_port: String,
    table: SignalTable,
    ports: Module1Ports,
    finalized: bool,
}

impl Module1Shell {
    fn new() -> Result<Self, SimError> {
        let mut table = SignalTable::new();
        let ports = Module1Ports::declare(&mut table)?;
        let instance = format!("{TOP_SCOPE}.{MODULE_INSTANCE}");
        let data_port = table.get(ports.data).name.clone();
        Ok(Self {
            instance,
            data_port,
            table,
            ports,
            finalized: false,
        })
    }

    fn finalize(&mut self) {
        if !self.finalized {
            tracing::debug!(instance = %self.instance, "model finalized");
            self.finalized = true;
        }
    }
}

/// Implements the port-driving half of [`Model`] by forwarding to a
/// [`Module1Shell`] field named `shell`.
macro_rules! forward_module1_ports {
    () => {
        fn instance_name(&self) -> &str {
            &self.shell.instance
        }

        fn poke_clock(&mut self, level: bool) {
            self.shell.table.set_bit(self.shell.ports.clock, level);
        }

        fn poke_reset(&mut self, level: bool) {
            self.shell.table.set_bit(self.shell.ports.reset, level);
        }

        fn poke_data(&mut self, bit: bool) {
            self.shell.table.set_bit(self.shell.ports.data, bit);
        }

        fn data(&self) -> bool {
            self.shell.table.bit(self.shell.ports.data)
        }

        fn data_port_name(&self) -> &str {
            &self.shell.data_port
        }

        fn finalize(&mut self) {
            self.shell.finalize();
        }

        fn is_finalized(&self) -> bool {
            self.shell.finalized
        }

        fn signals(&self) -> &SignalTable {
            &self.shell.table
        }
    };
}

/// Returns `true` on a 0 → 1 transition.
fn is_posedge(prev: bool, curr: bool) -> bool {
    !prev && curr
}

/// A module whose output is its input delayed by one clock cycle.
///
/// `m0.o_a_b` is a flip-flop sampling `m0.i_a_b` on the rising clock edge.
/// The register is not reset; it powers up at 0.
#[derive(Debug)]
pub struct DelayModule {
    shell: Module1Shell,
    last_clock: bool,
}

impl DelayModule {
    /// Creates the module with all signals at 0.
    pub fn new() -> Result<Self, SimError> {
        Ok(Self {
            shell: Module1Shell::new()?,
            last_clock: false,
        })
    }
}

impl Model for DelayModule {
    forward_module1_ports!();

    fn eval(&mut self) {
        let ports = self.shell.ports;
        let table = &mut self.shell.table;
        ports.bind_m0(table);

        let clock = table.bit(ports.m0_clock);
        if is_posedge(self.last_clock, clock) {
            let d = table.bit(ports.m0_data);
            table.set_bit(ports.m0_out, d);
        }
        self.last_clock = clock;
    }
}

/// A module whose output follows its input within the same evaluation.
#[derive(Debug)]
pub struct PassthroughModule {
    shell: Module1Shell,
}

impl PassthroughModule {
    /// Creates the module with all signals at 0.
    pub fn new() -> Result<Self, SimError> {
        Ok(Self {
            shell: Module1Shell::new()?,
        })
    }
}

impl Model for PassthroughModule {
    forward_module1_ports!();

    fn eval(&mut self) {
        let ports = self.shell.ports;
        let table = &mut self.shell.table;
        ports.bind_m0(table);
        let d = table.bit(ports.m0_data);
        table.set_bit(ports.m0_out, d);
    }
}
