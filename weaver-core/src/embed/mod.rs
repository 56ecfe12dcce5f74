//! The embedding engine: setup, the placement heuristic, and the outer
//! search loop, behind the [`find_embedding`] entry point.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::EmbeddingError;

/// Chain bookkeeping and the chain store.
pub mod chains;

/// Multi-source weighted shortest paths and per-worker scratch.
pub mod dijkstra;

/// Options, defaults, and the cancellation token.
pub mod options;

/// The per-vertex placement heuristic.
pub(crate) mod placement;

/// The outer search loop and quality ordering.
pub(crate) mod search;

/// Label translation, pins, and problem assembly.
pub(crate) mod setup;

/// Target-graph weights, use counts, and restrict masks.
pub mod target;

pub use chains::{Chain, ChainStore, NO_NODE};
pub use dijkstra::{shortest_paths, Cost, DijkstraScratch, DistanceField, ScratchPool};
pub use options::{CancelToken, EmbeddingOptions};
pub use target::TargetState;

use search::Embedder;

/// Summary statistics of a returned embedding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmbeddingStats {
    /// Length of the longest chain.
    pub max_chain_length: usize,
    /// Total number of target nodes used, counted with multiplicity.
    pub total_chain_length: usize,
    /// Largest number of chains sharing one target node.
    pub max_overlap: u32,
}

/// The outcome of [`find_embedding`]: the chain mapping plus its quality.
#[derive(Clone, Debug)]
pub struct Embedding<L> {
    /// For each embedded source label, the ordered target labels of its
    /// chain (anchor first). Sources whose chain stayed empty are absent.
    pub chains: HashMap<L, Vec<L>>,
    /// True iff the mapping is a proper embedding: chains pairwise disjoint
    /// and every source edge witnessed by a target edge.
    pub valid: bool,
    /// Chain-length and overlap statistics of the mapping.
    pub stats: EmbeddingStats,
}

/// Attempts to embed the source graph into the target graph as node-disjoint
/// connected chains.
///
/// Both graphs are given as edge lists over an arbitrary hashable label
/// type. The returned mapping sends each source label to the ordered target
/// labels of its chain; when the search ran out of time, tries, or patience
/// the mapping is the best attempt found and `valid` is false.
///
/// # Errors
///
/// Returns an error for out-of-range options, chain hints referencing
/// unknown labels, and overlapping or disconnected fixed chains - all
/// detected before any search work starts.
///
/// # Example
///
/// ```
/// use weaver_core::{find_embedding, EmbeddingOptions};
///
/// // A triangle fits a triangle with every chain a single node.
/// let source = [("a", "b"), ("b", "c"), ("a", "c")];
/// let target = [("x", "y"), ("y", "z"), ("x", "z")];
/// let options = EmbeddingOptions {
///     random_seed: Some(1),
///     ..Default::default()
/// };
/// let embedding = find_embedding(source, target, &options).unwrap();
/// assert!(embedding.valid);
/// assert_eq!(embedding.chains.len(), 3);
/// ```
pub fn find_embedding<L, S, T>(
    source_edges: S,
    target_edges: T,
    options: &EmbeddingOptions<L>,
) -> Result<Embedding<L>, EmbeddingError>
where
    L: Clone + Eq + Hash + Debug,
    S: IntoIterator<Item = (L, L)>,
    T: IntoIterator<Item = (L, L)>,
{
    let source_edges: Vec<(L, L)> = source_edges.into_iter().collect();
    let target_edges: Vec<(L, L)> = target_edges.into_iter().collect();
    let (problem, source_labels, target_labels) =
        setup::build_problem(&source_edges, &target_edges, options)?;

    let mut engine = Embedder::new(problem)?;
    engine.run();
    let (snapshot, fixed, valid) = engine.finish();

    let num_user_sources = source_labels.len();
    let num_user_targets = target_labels.len();

    // Failure mode: nothing placed beyond the fixed chains means an empty
    // mapping, not a fixed-chains-only one.
    let mut any_movable = false;
    let mut any_movable_placed = false;
    for v in 0..num_user_sources {
        if fixed[v] {
            continue;
        }
        any_movable = true;
        if !snapshot[v].is_empty() {
            any_movable_placed = true;
        }
    }
    if any_movable && !any_movable_placed {
        return Ok(Embedding {
            chains: HashMap::new(),
            valid: false,
            stats: EmbeddingStats::default(),
        });
    }

    let mut chains = HashMap::with_capacity(num_user_sources);
    let mut stats = EmbeddingStats::default();
    let mut uses = vec![0u32; num_user_targets];
    for v in 0..num_user_sources {
        let chain = &snapshot[v];
        if chain.is_empty() {
            continue;
        }
        stats.max_chain_length = stats.max_chain_length.max(chain.len());
        stats.total_chain_length += chain.len();
        let members: Vec<L> = chain
            .iter()
            .map(|t| {
                uses[t as usize] += 1;
                target_labels.label(t).clone()
            })
            .collect();
        chains.insert(source_labels.label(v as u32).clone(), members);
    }
    stats.max_overlap = uses.iter().copied().max().unwrap_or(0);

    Ok(Embedding {
        chains,
        valid,
        stats,
    })
}
