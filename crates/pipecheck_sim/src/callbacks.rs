//! Value-change notifications for watched signals.
//!
//! [`ValueCallbacks`] remembers the last value it reported for each watched
//! signal. Calling [`call_value_cbs`](ValueCallbacks::call_value_cbs) after a
//! model evaluation compares the current values against those snapshots and
//! hands every difference to the registered [`ValueChangeSink`]s.

use crate::error::SimError;
use crate::time::SimTime;
use crate::value::{SignalId, SignalTable};

/// A single reported change of a watched signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueChange {
    /// Time at which the change was observed.
    pub time: SimTime,
    /// The signal that changed.
    pub signal: SignalId,
    /// The new value.
    pub value: u64,
}

/// Receiver of value-change notifications.
pub trait ValueChangeSink {
    /// Called once for every observed change, in watch registration order.
    fn value_changed(&mut self, change: &ValueChange) -> Result<(), SimError>;

    /// Called once when the run is over.
    fn finish(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

#[derive(Debug)]
struct Watch {
    signal: SignalId,
    last: Option<u64>,
}

/// Registry of watched signals and the sinks that receive their changes.
#[derive(Default)]
pub struct ValueCallbacks {
    watches: Vec<Watch>,
    sinks: Vec<Box<dyn ValueChangeSink>>,
}

impl ValueCallbacks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching a signal. Watching the same signal twice is a no-op.
    ///
    /// The first delivery after registration always reports the signal's
    /// value, which gives sinks an initial dump.
    pub fn watch(&mut self, signal: SignalId) {
        if self.watches.iter().any(|w| w.signal == signal) {
            return;
        }
        self.watches.push(Watch { signal, last: None });
    }

    /// Watches every signal in `table`.
    pub fn watch_all(&mut self, table: &SignalTable) {
        for (id, _) in table.iter() {
            self.watch(id);
        }
    }

    /// Registers a sink that receives all future changes.
    pub fn add_sink(&mut self, sink: Box<dyn ValueChangeSink>) {
        self.sinks.push(sink);
    }

    /// Delivers pending changes on watched signals to every sink.
    ///
    /// Returns the number of changes found.
    pub fn call_value_cbs(
        &mut self,
        table: &SignalTable,
        time: SimTime,
    ) -> Result<usize, SimError> {
        let mut delivered = 0;
        for watch in &mut self.watches {
            let value = table.value(watch.signal);
            if watch.last == Some(value) {
                continue;
            }
            watch.last = Some(value);
            let change = ValueChange {
                time,
                signal: watch.signal,
                value,
            };
            for sink in &mut self.sinks {
                sink.value_changed(&change)?;
            }
            delivered += 1;
        }
        if delivered > 0 {
            tracing::trace!(%time, delivered, "value-change callbacks");
        }
        Ok(delivered)
    }

    /// Finishes every sink. Call once after the last delivery.
    pub fn finish(&mut self) -> Result<(), SimError> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
