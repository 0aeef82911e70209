//! Signal storage with hierarchical names.
//!
//! Every signal of a model lives in one flat [`SignalTable`] and is addressed
//! by a [`SignalId`]. The table also keeps the dotted hierarchical name of
//! each signal (`TOP.Module1.m0.o_a_b`) so that names can be resolved to IDs
//! at run time.

use crate::error::SimError;

/// Opaque ID for a signal in a [`SignalTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates a `SignalId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Runtime state of a single signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalState {
    /// Hierarchical name for lookup and waveform output.
    pub name: String,
    /// Bit width of this signal (1..=64).
    pub width: u32,
    /// Current value, always masked to `width` bits.
    pub value: u64,
}

impl SignalState {
    /// Returns the bit mask covering this signal's width.
    pub fn mask(&self) -> u64 {
        width_mask(self.width)
    }
}

/// Returns a mask with the low `width` bits set.
fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Flat storage for all signals of a model.
#[derive(Clone, Debug, Default)]
pub struct SignalTable {
    signals: Vec<SignalState>,
}

impl SignalTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new signal and returns its ID.
    ///
    /// Fails if the name is already taken or `init` does not fit in `width`.
    pub fn declare(&mut self, name: &str, width: u32, init: u64) -> Result<SignalId, SimError> {
        if self.find(name).is_some() {
            return Err(SimError::DuplicateSignal(name.to_string()));
        }
        if init & !width_mask(width) != 0 {
            return Err(SimError::ValueOutOfRange {
                name: name.to_string(),
                width,
                value: init,
            });
        }
        let id = SignalId::from_raw(self.signals.len() as u32);
        self.signals.push(SignalState {
            name: name.to_string(),
            width,
            value: init,
        });
        Ok(id)
    }

    /// Finds a signal by its full hierarchical name.
    pub fn find(&self, name: &str) -> Option<SignalId> {
        self.signals
            .iter()
            .position(|s| s.name == name)
            .map(|idx| SignalId::from_raw(idx as u32))
    }

    /// Returns the state of a signal.
    ///
    /// IDs are only handed out by [`declare`](Self::declare), so a foreign ID
    /// is a programming error and panics.
    pub fn get(&self, id: SignalId) -> &SignalState {
        &self.signals[id.as_raw() as usize]
    }

    /// Returns the current value of a signal.
    pub fn value(&self, id: SignalId) -> u64 {
        self.get(id).value
    }

    /// Returns the current value of a signal as a single bit.
    pub fn bit(&self, id: SignalId) -> bool {
        self.get(id).value & 1 == 1
    }

    /// Writes a value, truncating it to the signal's width.
    pub fn set(&mut self, id: SignalId, value: u64) {
        let sig = &mut self.signals[id.as_raw() as usize];
        sig.value = value & sig.mask();
    }

    /// Writes a single-bit value.
    pub fn set_bit(&mut self, id: SignalId, bit: bool) {
        self.set(id, u64::from(bit));
    }

    /// Iterates over all signals in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, &SignalState)> {
        self.signals
            .iter()
            .enumerate()
            .map(|(idx, s)| (SignalId::from_raw(idx as u32), s))
    }

    /// Returns the number of declared signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if no signals are declared.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_id_roundtrip() {
        let id = SignalId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn declare_and_find() {
        let mut table = SignalTable::new();
        let clk = table.declare("TOP.clk", 1, 0).unwrap();
        let data = table.declare("TOP.data", 8, 0x5a).unwrap();
        assert_eq!(table.find("TOP.clk"), Some(clk));
        assert_eq!(table.find("TOP.data"), Some(data));
        assert_eq!(table.find("TOP.missing"), None);
        assert_eq!(table.value(data), 0x5a);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn find_requires_full_path() {
        let mut table = SignalTable::new();
        table.declare("TOP.Module1.m0.o_a_b", 1, 0).unwrap();
        assert!(table.find("o_a_b").is_none());
        assert!(table.find("Module1.m0.o_a_b").is_none());
        assert!(table.find("TOP.Module1.m0.o_a_b").is_some());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut table = SignalTable::new();
        table.declare("TOP.clk", 1, 0).unwrap();
        let err = table.declare("TOP.clk", 1, 0).unwrap_err();
        assert!(matches!(err, SimError::DuplicateSignal(_)));
    }

    #[test]
    fn init_out_of_range_rejected() {
        let mut table = SignalTable::new();
        let err = table.declare("TOP.bit", 1, 2).unwrap_err();
        match err {
            SimError::ValueOutOfRange { width, value, .. } => {
                assert_eq!(width, 1);
                assert_eq!(value, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn set_truncates_to_width() {
        let mut table = SignalTable::new();
        let nibble = table.declare("TOP.nibble", 4, 0).unwrap();
        table.set(nibble, 0x1f);
        assert_eq!(table.value(nibble), 0xf);
    }

    #[test]
    fn bit_accessors() {
        let mut table = SignalTable::new();
        let b = table.declare("TOP.b", 1, 0).unwrap();
        assert!(!table.bit(b));
        table.set_bit(b, true);
        assert!(table.bit(b));
        assert_eq!(table.value(b), 1);
    }

    #[test]
    fn wide_signal_mask() {
        let mut table = SignalTable::new();
        let wide = table.declare("TOP.wide", 64, u64::MAX).unwrap();
        assert_eq!(table.value(wide), u64::MAX);
    }

    #[test]
    fn iter_in_declaration_order() {
        let mut table = SignalTable::new();
        table.declare("TOP.a", 1, 0).unwrap();
        table.declare("TOP.b", 1, 1).unwrap();
        let names: Vec<_> = table.iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["TOP.a", "TOP.b"]);
    }

    #[test]
    fn empty_table() {
        let table = SignalTable::new();
        assert!(table.is_empty());
    }
}
