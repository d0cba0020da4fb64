//! Error types for type-switch linking and dispatch.
//!
//! Link errors are raised synchronously at link time and abort the link —
//! nothing partial is ever cached. Dispatch errors are caller bugs
//! (precondition violations) and fail fast; they are never retried.
//!
//! An absent value is NOT an error: it is the contractual `-1` result
//! (`NO_VALUE`), answered before any strategy runs.

use crate::call_site::CallSiteId;
use mira_classes::ClassId;
use thiserror::Error;

/// Error linking a call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A pattern slot holds the `INVALID` sentinel (unresolved descriptor).
    #[error("pattern at index {index} is absent")]
    AbsentPattern { index: usize },

    /// A pattern names a class the class table has never registered.
    #[error("pattern at index {index} names unknown class {class:?}")]
    UnknownClass { index: usize, class: ClassId },

    /// The same class appears twice in one pattern list.
    #[error("duplicate pattern {class:?} at indices {first} and {second}")]
    DuplicatePattern {
        class: ClassId,
        first: usize,
        second: usize,
    },

    /// The link request's value class is not a registered class.
    #[error("value class {class:?} is not a registered class")]
    InvalidValueClass { class: ClassId },
}

/// Error dispatching against a linked call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Dispatch requested before the call site was linked.
    #[error("call site {call_site:?} has not been linked")]
    UnlinkedCallSite { call_site: CallSiteId },

    /// `start_index` exceeds the pattern table size.
    #[error("start index {start_index} out of range for table of {len} patterns")]
    StartIndexOutOfRange { start_index: u32, len: usize },
}
