//! Problem preparation: label translation, option resolution, suspension
//! pins, and fixed-chain validation.
//!
//! Everything label-shaped is resolved to dense ids here, before any
//! heuristic work; the engine itself never sees a label. Suspension
//! constraints are materialized as auxiliary graph structure: one fresh
//! source vertex and one fresh target node per blob, wired so that covering
//! the auxiliary edge forces the suspended chain to touch the blob.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::embed::options::{CancelToken, EmbeddingOptions, ResolvedOptions};
use crate::error::EmbeddingError;
use crate::graph::{Graph, LabelTable};
use crate::rng;

/// A fully dense-id embedding problem, ready for the engine.
#[derive(Debug)]
pub(crate) struct Problem {
    /// Source adjacency, including pin vertices.
    pub source: Graph,
    /// Target adjacency, including pin nodes.
    pub target: Graph,
    /// Immutable chains (user fixed chains plus pins), sorted by source id.
    pub fixed: Vec<(u32, Vec<u32>)>,
    /// Seed chains, re-installed at every restart.
    pub initial: Vec<(u32, Vec<u32>)>,
    /// Per-source permitted target sets.
    pub restrict: Vec<(u32, Vec<u32>)>,
    /// Pin target nodes, off-limits to ordinary placements.
    pub reserved: Vec<u32>,
    pub opts: ResolvedOptions,
    pub cancel: CancelToken,
}

/// Translates, validates, and assembles the caller's input into a
/// [`Problem`]. Returns the label tables alongside so the result mapping
/// can be translated back.
#[allow(clippy::type_complexity)]
pub(crate) fn build_problem<L>(
    source_edges: &[(L, L)],
    target_edges: &[(L, L)],
    opts: &EmbeddingOptions<L>,
) -> Result<(Problem, LabelTable<L>, LabelTable<L>), EmbeddingError>
where
    L: Clone + Eq + Hash + Debug,
{
    opts.validate()?;
    let seed = match opts.random_seed {
        Some(seed) => seed,
        None => rng::from_entropy().0,
    };

    let mut source_labels = LabelTable::new();
    let mut src_edges: Vec<(u32, u32)> = source_edges
        .iter()
        .map(|(a, b)| (source_labels.intern(a), source_labels.intern(b)))
        .collect();
    let mut target_labels = LabelTable::new();
    let mut tgt_edges: Vec<(u32, u32)> = target_edges
        .iter()
        .map(|(a, b)| (target_labels.intern(a), target_labels.intern(b)))
        .collect();

    let resolve_source = |context: &'static str, label: &L| -> Result<u32, EmbeddingError> {
        source_labels
            .get(label)
            .ok_or_else(|| EmbeddingError::UnknownLabel {
                context,
                graph: "source",
                label: format!("{label:?}"),
            })
    };
    let resolve_targets = |context: &'static str, labels: &[L]| -> Result<Vec<u32>, EmbeddingError> {
        labels
            .iter()
            .map(|label| {
                target_labels
                    .get(label)
                    .ok_or_else(|| EmbeddingError::UnknownLabel {
                        context,
                        graph: "target",
                        label: format!("{label:?}"),
                    })
            })
            .collect()
    };

    let mut fixed: Vec<(u32, Vec<u32>)> = Vec::new();
    for (label, chain) in &opts.fixed_chains {
        let v = resolve_source("fixed_chains", label)?;
        if chain.is_empty() {
            return Err(EmbeddingError::BadFixedChain {
                source_label: format!("{label:?}"),
                reason: "empty",
            });
        }
        fixed.push((v, resolve_targets("fixed_chains", chain)?));
    }
    fixed.sort_by_key(|&(v, _)| v);
    let fixed_sources: FxHashSet<u32> = fixed.iter().map(|&(v, _)| v).collect();

    let mut initial: Vec<(u32, Vec<u32>)> = Vec::new();
    for (label, chain) in &opts.initial_chains {
        let v = resolve_source("initial_chains", label)?;
        // Fixed chains take precedence over seeds for the same vertex.
        if chain.is_empty() || fixed_sources.contains(&v) {
            continue;
        }
        initial.push((v, resolve_targets("initial_chains", chain)?));
    }
    initial.sort_by_key(|&(v, _)| v);

    let mut restrict: Vec<(u32, Vec<u32>)> = Vec::new();
    for (label, allowed) in &opts.restrict_chains {
        let v = resolve_source("restrict_chains", label)?;
        // An empty restrict set means the constraint is inactive.
        if allowed.is_empty() {
            continue;
        }
        restrict.push((v, resolve_targets("restrict_chains", allowed)?));
    }
    restrict.sort_by_key(|&(v, _)| v);

    let mut suspend: Vec<(u32, Vec<Vec<u32>>)> = Vec::new();
    for (label, blobs) in &opts.suspend_chains {
        let v = resolve_source("suspend_chains", label)?;
        let mut resolved = Vec::with_capacity(blobs.len());
        for blob in blobs {
            if blob.is_empty() {
                return Err(EmbeddingError::EmptySuspendBlob {
                    source_label: format!("{label:?}"),
                });
            }
            resolved.push(resolve_targets("suspend_chains", blob)?);
        }
        suspend.push((v, resolved));
    }
    suspend.sort_by_key(|&(v, _)| v);

    // Materialize the pins: one auxiliary source/target pair per blob. The
    // pin chain is fixed to the auxiliary target, whose only edges lead into
    // the blob, so covering the auxiliary source edge forces the suspended
    // chain onto the blob.
    let num_user_sources = source_labels.len() as u32;
    let num_user_targets = target_labels.len() as u32;
    let mut next_source = num_user_sources;
    let mut next_target = num_user_targets;
    let mut reserved = Vec::new();
    for (v, blobs) in &suspend {
        for blob in blobs {
            let pin_source = next_source;
            let pin_target = next_target;
            next_source += 1;
            next_target += 1;
            src_edges.push((*v, pin_source));
            for &q in blob {
                tgt_edges.push((pin_target, q));
            }
            fixed.push((pin_source, vec![pin_target]));
            reserved.push(pin_target);
        }
    }

    let source = Graph::from_edges(next_source as usize, &src_edges);
    let target = Graph::from_edges(next_target as usize, &tgt_edges);

    // Fixed chains must be pairwise disjoint and individually connected.
    let source_name = |v: u32| {
        if v < num_user_sources {
            format!("{:?}", source_labels.label(v))
        } else {
            format!("pin {}", v - num_user_sources)
        }
    };
    let mut owner: FxHashMap<u32, u32> = FxHashMap::default();
    for (v, members) in &fixed {
        let mut seen = FxHashSet::default();
        for &t in members {
            if !seen.insert(t) {
                continue;
            }
            if let Some(&other) = owner.get(&t) {
                let node = if t < num_user_targets {
                    format!("{:?}", target_labels.label(t))
                } else {
                    format!("pin {}", t - num_user_targets)
                };
                return Err(EmbeddingError::FixedChainOverlap {
                    first: source_name(other),
                    second: source_name(*v),
                    node,
                });
            }
            owner.insert(t, *v);
        }
        if !is_connected_subset(&target, members) {
            return Err(EmbeddingError::BadFixedChain {
                source_label: source_name(*v),
                reason: "not connected in the target graph",
            });
        }
    }

    let problem = Problem {
        source,
        target,
        fixed,
        initial,
        restrict,
        reserved,
        opts: ResolvedOptions::from_options(opts, seed),
        cancel: opts.cancel.clone(),
    };
    Ok((problem, source_labels, target_labels))
}

/// Whether `members` induce a connected subgraph of `graph`.
fn is_connected_subset(graph: &Graph, members: &[u32]) -> bool {
    let distinct: FxHashSet<u32> = members.iter().copied().collect();
    if distinct.is_empty() {
        return true;
    }
    let mut reached = FxHashSet::default();
    let mut frontier = vec![members[0]];
    reached.insert(members[0]);
    while let Some(q) = frontier.pop() {
        for &p in graph.neighbors(q) {
            if distinct.contains(&p) && reached.insert(p) {
                frontier.push(p);
            }
        }
    }
    reached.len() == distinct.len()
}
