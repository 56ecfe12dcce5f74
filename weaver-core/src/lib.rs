//! # weaver-core: Heuristic Minor-Embedding Engine
//!
//! `weaver-core` maps a *source* graph onto a *target* graph by assigning
//! each source vertex a **chain** - a nonempty connected set of target
//! nodes - such that distinct chains are node-disjoint and every source
//! edge is witnessed by a target edge between the two chains. Finding such
//! an assignment is the minor-embedding problem at the heart of compiling
//! problems onto quantum-annealer hardware graphs, where a few hundred
//! logical variables must share a few thousand physical qubits.
//!
//! ## Overview
//!
//! The engine is a modernized implementation of the Cai-Macready-Roy
//! placement heuristic:
//!
//! 1. **Place** one vertex at a time: run a multi-source weighted shortest
//!    path from each embedded neighbor's chain, pick the target node
//!    minimizing the summed distances, and take the union of the cheapest
//!    paths back as the new chain.
//! 2. **Overlap, then repair**: chains may share target nodes during the
//!    search. Each shared node costs `β^u - 1` to route through, and β
//!    grows from pass to pass until the overlaps are squeezed out.
//! 3. **Shrink**: once a proper embedding exists, keep tearing and
//!    re-placing chains - now pruning useless leaves - to shorten the
//!    longest chains.
//!
//! ## Quick Start
//!
//! ```
//! use weaver_core::{find_embedding, EmbeddingOptions};
//!
//! // Embed a triangle into a 4-cycle.
//! let source = [(0, 1), (1, 2), (0, 2)];
//! let target = [(10, 11), (11, 13), (13, 12), (12, 10)];
//! let options = EmbeddingOptions {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let embedding = find_embedding(source, target, &options).unwrap();
//! assert!(embedding.valid);
//! // One of the three chains spans two target nodes.
//! assert_eq!(embedding.stats.total_chain_length, 4);
//! ```
//!
//! ## Module Organization
//!
//! - [`embed`] - the engine: options, chain store, Dijkstra, placement,
//!   outer loop, and the [`find_embedding`] entry point
//! - [`heap`] - pairing-heap priority queue with decrease-key and
//!   generation-counter reset
//! - [`graph`] - dense-id adjacency and the label interner
//! - [`rng`] - seeded xorshift-family randomness
//! - [`error`] - the usage-error taxonomy
//!
//! ## Determinism
//!
//! With `threads = 1` and a fixed `random_seed`, two runs over identical
//! inputs produce identical mappings. With more worker threads the
//! neighbor-distance phase runs in parallel; results are joined in a fixed
//! order, so runs remain reproducible in practice, but this is not
//! guaranteed.

#![deny(missing_docs)]

// =============================================================================
// Module Declarations
// =============================================================================

/// The embedding engine and its entry point.
pub mod embed;

/// Error taxonomy.
pub mod error;

/// Input graphs and label interning.
pub mod graph;

/// Pairing-heap priority queue.
pub mod heap;

/// Seeded randomness.
pub mod rng;

// =============================================================================
// Convenience Re-exports (Clean Public API)
// =============================================================================

// Entry point and result types
pub use embed::{find_embedding, Embedding, EmbeddingStats};

// Configuration
pub use embed::{CancelToken, EmbeddingOptions};

// Errors
pub use error::EmbeddingError;

// Engine building blocks (for advanced users and tests)
pub use embed::{Chain, ChainStore, Cost, DistanceField, TargetState};
pub use graph::{Graph, LabelTable};
pub use heap::{FastResetQueue, PairingQueue};
