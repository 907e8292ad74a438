//! Typed errors surfaced by the orchestrator.
//!
//! Validation failures and the iteration-cap guard are the only error paths
//! in the core: everything else is total on well-formed input.

use thiserror::Error;

/// Errors the orchestrator can return. Never constructed for conditions a
/// caller cannot act on — `IterationCapExceeded` in particular indicates a
/// buggy policy or a pathological/malicious workload, not ordinary misuse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The workload failed up-front validation. Carries every violation
    /// found so the caller can report them all at once rather than
    /// one-at-a-time.
    #[error("invalid workload: {}", .messages.join("; "))]
    InvalidWorkload { messages: Vec<String> },

    /// The configuration or CLI input named a discipline the orchestrator
    /// does not implement.
    #[error("unknown scheduling discipline: {0}")]
    UnknownDiscipline(String),

    /// The engine ran for `at_tick` ticks without every process reaching
    /// TERMINATED. Guards against policies that never make progress.
    #[error("simulation did not terminate within {at_tick} ticks")]
    IterationCapExceeded { at_tick: u64 },
}
