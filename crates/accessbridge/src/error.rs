//! Error taxonomy of the host layer
//!
//! `LoadError` (fatal, startup-only) is re-exported from the sys crate.
//! Everything at dispatch time is a [`DispatchError`]: recoverable,
//! scoped to the single provider call that produced it, and converted by
//! callers into a per-property error marker rather than a tree-wide
//! failure. Use-after-release is deliberately NOT here — that is a caller
//! bug and panics.

use thiserror::Error;

pub use accessbridge_sys::LoadError;

/// A single provider call failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The provider returned its failure sentinel for this call.
    #[error("provider call failed: {call}")]
    Failure {
        /// The provider export that reported failure
        call: &'static str,
    },

    /// The provider returned an action batch failure, reporting the index
    /// of the first action that did not execute.
    #[error("accessible action at index {index} failed")]
    ActionFailed {
        /// Index into the submitted action batch
        index: i32,
    },

    /// The provider violated its own wire contract; treated exactly like a
    /// call failure by callers.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
}

impl DispatchError {
    pub(crate) fn failure(call: &'static str) -> Self {
        DispatchError::Failure { call }
    }
}

/// A wire structure could not be interpreted without reading out of
/// bounds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A count field exceeds the fixed capacity actually populated.
    #[error("provider reported {count} elements in {field}, capacity is {capacity}")]
    CountExceedsCapacity {
        /// Which array field was affected
        field: &'static str,
        /// The count the provider reported
        count: i64,
        /// The fixed capacity of the backing array
        capacity: usize,
    },
}

/// Result of one provider call.
pub type DispatchResult<T> = Result<T, DispatchError>;
