//! Harness error types.
//!
//! An invariant violation is not an error: it is a normal outcome of a run
//! and is reported through [`RunState::Failed`](crate::RunState::Failed).
//! Everything in [`HarnessError`] aborts the run.

use std::io;

use pipecheck_sim::SimError;

/// Errors that abort a harness run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A hierarchical signal path does not exist in the model.
    ///
    /// This means the harness and the module-under-test disagree about the
    /// design's structure; it is never retried.
    #[error("{file}:{line}: {component}: no handle found for '{path}'")]
    Unresolved {
        /// The path that failed to resolve.
        path: String,
        /// The harness component that requested the lookup.
        component: &'static str,
        /// Source file of the failing lookup.
        file: &'static str,
        /// Source line of the failing lookup.
        line: u32,
    },

    /// A probed signal holds a value that does not fit the checker's
    /// signed integer.
    #[error("signal '{path}' holds {value}, which does not fit in i64")]
    ValueOutOfRange {
        /// Hierarchical path of the signal.
        path: String,
        /// The raw value read.
        value: u64,
    },

    /// The simulation engine reported an error.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Writing console output failed.
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}
