//! Name-based signal probing.
//!
//! A [`SignalProbe`] turns a dotted hierarchical path into an opaque
//! [`Handle`] and reads the signal behind it as a plain integer. Paths cross
//! the module boundary, so they are only checked at run time; a path that
//! does not exist yields [`HarnessError::Unresolved`].

use pipecheck_sim::{SignalId, SignalTable, TOP_SCOPE};

use crate::error::HarnessError;

/// Component name reported when a probe lookup fails.
const PROBE_COMPONENT: &str = "probe";

/// Opaque reference to a resolved signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(SignalId);

/// Read-only access to signals by hierarchical name.
pub trait SignalProbe {
    /// Resolves a full hierarchical path (e.g. `TOP.Module1.m0.o_a_b`).
    fn resolve(&self, path: &str) -> Result<Handle, HarnessError>;

    /// Reads the current value of a resolved signal.
    ///
    /// The value reflects the last model evaluation; reading before the
    /// current tick has been evaluated returns the previous tick's value.
    /// A 64-bit signal with its top bit set does not fit and is an error.
    fn read_int(&self, handle: Handle) -> Result<i64, HarnessError>;
}

impl SignalProbe for SignalTable {
    fn resolve(&self, path: &str) -> Result<Handle, HarnessError> {
        self.find(path)
            .map(Handle)
            .ok_or_else(|| HarnessError::Unresolved {
                path: path.to_string(),
                component: PROBE_COMPONENT,
                file: file!(),
                line: line!(),
            })
    }

    fn read_int(&self, handle: Handle) -> Result<i64, HarnessError> {
        let value = self.value(handle.0);
        i64::try_from(value).map_err(|_| HarnessError::ValueOutOfRange {
            path: self.get(handle.0).name.clone(),
            value,
        })
    }
}

/// Returns `path` without the leading root scope, for display.
///
/// `TOP.Module1.m0.o_a_b` becomes `Module1.m0.o_a_b`; paths outside the root
/// scope are returned unchanged.
pub fn display_name(path: &str) -> &str {
    path.strip_prefix(TOP_SCOPE)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(path)
}
