//! Error taxonomy for the embedding engine.
//!
//! Only pre-run problems and internal invariant breaches are errors. Failing
//! to find an embedding is not: the heuristic surfaces that through the
//! returned [`Embedding`](crate::Embedding) and its `valid` flag.

use thiserror::Error;

/// Errors raised before or during a call to
/// [`find_embedding`](crate::find_embedding).
///
/// All `Usage*` variants are raised eagerly, before any heuristic work runs.
/// [`Internal`](EmbeddingError::Internal) indicates an invariant breach inside
/// the engine and is never expected in normal operation.
///
/// Node labels are formatted into the message at the raise site so the error
/// type stays independent of the caller's label type.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// An option value falls outside its documented range.
    #[error("option `{name}` out of range: {reason}")]
    OptionOutOfRange {
        /// Name of the offending option key.
        name: &'static str,
        /// Human-readable description of the violation.
        reason: String,
    },

    /// A chain hint (initial, fixed, restrict, or suspend) references a node
    /// label that does not appear in any edge of the corresponding graph.
    #[error("{context} references unknown {graph} node {label}")]
    UnknownLabel {
        /// Which option the label came from.
        context: &'static str,
        /// `"source"` or `"target"`.
        graph: &'static str,
        /// The offending label, `Debug`-formatted.
        label: String,
    },

    /// Two fixed chains claim the same target node.
    #[error("fixed chains for {first} and {second} overlap at target {node}")]
    FixedChainOverlap {
        /// First fixed source, `Debug`-formatted.
        first: String,
        /// Second fixed source, `Debug`-formatted.
        second: String,
        /// Shared target node, `Debug`-formatted.
        node: String,
    },

    /// A fixed chain is empty or not connected in the target graph.
    #[error("fixed chain for {source_label} is {reason}")]
    BadFixedChain {
        /// The fixed source, `Debug`-formatted.
        source_label: String,
        /// `"empty"` or `"not connected in the target graph"`.
        reason: &'static str,
    },

    /// A suspension blob is empty and therefore unsatisfiable.
    #[error("suspend_chains for {source_label} contains an empty blob")]
    EmptySuspendBlob {
        /// The suspended source, `Debug`-formatted.
        source_label: String,
    },

    /// An internal invariant was violated. This is a bug in the engine, not
    /// in the caller's input.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
