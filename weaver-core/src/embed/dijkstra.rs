//! Multi-source weighted shortest paths from a chain to the whole target
//! graph.
//!
//! One run answers: starting anywhere in a neighbor's chain, how cheaply can
//! a new chain reach each target node under the current overlap weights?
//! The answer (a distance and a parent per node) is what the placement
//! heuristic sums and walks to build chains.
//!
//! Ties are broken first by hop count from the seed set, then by target id
//! inside the queue, so the produced parent forest is deterministic.

use std::cmp::Ordering;
use std::sync::Mutex;

use crate::embed::chains::NO_NODE;
use crate::embed::target::TargetState;
use crate::heap::FastResetQueue;

/// Priority of a target node during the search: β-weighted distance from
/// the seed set, tie-broken by hop count.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cost {
    /// Accumulated node-weight distance.
    pub dist: f64,
    /// Edges traversed from the nearest seed.
    pub hops: u32,
}

impl Cost {
    /// The seed priority.
    pub const ZERO: Cost = Cost { dist: 0.0, hops: 0 };
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Distances are never NaN, so total_cmp agrees with the usual order.
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.hops.cmp(&other.hops))
    }
}

/// Per-worker scratch: the priority queue, reused across runs via its
/// generation-counter reset.
pub struct DijkstraScratch {
    heap: FastResetQueue<Cost>,
}

impl DijkstraScratch {
    /// Scratch sized for a target graph with `num_nodes` nodes.
    #[must_use]
    pub fn new(num_nodes: usize) -> Self {
        Self {
            heap: FastResetQueue::new(num_nodes),
        }
    }
}

/// Output of one run: per-node distance and Dijkstra-tree parent.
///
/// Unreached nodes hold `f64::INFINITY` and [`NO_NODE`]; seeds hold distance
/// zero and [`NO_NODE`].
pub struct DistanceField {
    /// Minimum β-weighted distance from the seed set to each node.
    pub dist: Vec<f64>,
    /// Predecessor on a cheapest path, pointing back toward the seed set.
    pub parent: Vec<u32>,
}

impl DistanceField {
    /// A field sized for `num_nodes` target nodes.
    #[must_use]
    pub fn new(num_nodes: usize) -> Self {
        Self {
            dist: vec![f64::INFINITY; num_nodes],
            parent: vec![NO_NODE; num_nodes],
        }
    }
}

/// Computes multi-source shortest paths into `out`.
///
/// Every seed starts at distance zero. The cost of stepping from `t` into
/// `t2` is [`TargetState::cost_into`] for `source` - the vertex whose chain
/// is being rebuilt - so fill-capped nodes are unreachable and nodes outside
/// the source's restrict set carry the finite violation penalty.
pub fn shortest_paths<I>(
    scratch: &mut DijkstraScratch,
    out: &mut DistanceField,
    target: &TargetState,
    source: u32,
    seeds: I,
) where
    I: IntoIterator<Item = u32>,
{
    out.dist.fill(f64::INFINITY);
    out.parent.fill(NO_NODE);
    scratch.heap.reset();

    for seed in seeds {
        scratch.heap.set_value(seed, Cost::ZERO);
        out.dist[seed as usize] = 0.0;
    }

    while let Some((t, cost)) = scratch.heap.pop_min() {
        out.dist[t as usize] = cost.dist;
        for &t2 in target.graph.neighbors(t) {
            let w = target.cost_into(source, t2);
            if !w.is_finite() {
                continue;
            }
            let candidate = Cost {
                dist: cost.dist + w,
                hops: cost.hops + 1,
            };
            if scratch.heap.check_decrease_value(t2, candidate) {
                out.parent[t2 as usize] = t;
                out.dist[t2 as usize] = candidate.dist;
            }
        }
    }
}

/// Checkout pool of Dijkstra scratch buffers, one per worker thread.
///
/// The pool is filled once at setup; workers take a buffer for the duration
/// of one shortest-path run and return it. With at most `threads` runs in
/// flight the pool never allocates after construction.
pub struct ScratchPool {
    num_nodes: usize,
    free: Mutex<Vec<DijkstraScratch>>,
}

impl ScratchPool {
    /// A pool of `count` buffers sized for `num_nodes` target nodes.
    #[must_use]
    pub fn new(count: usize, num_nodes: usize) -> Self {
        let free = (0..count.max(1))
            .map(|_| DijkstraScratch::new(num_nodes))
            .collect();
        Self {
            num_nodes,
            free: Mutex::new(free),
        }
    }

    /// Takes a buffer; falls back to a fresh allocation if the pool is
    /// momentarily empty (more in-flight runs than buffers).
    pub fn take(&self) -> DijkstraScratch {
        let mut free = match self.free.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        free.pop()
            .unwrap_or_else(|| DijkstraScratch::new(self.num_nodes))
    }

    /// Returns a buffer to the pool.
    pub fn put(&self, scratch: DijkstraScratch) {
        let mut free = match self.free.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        free.push(scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn path_state(n: usize) -> TargetState {
        let edges: Vec<(u32, u32)> = (0..n as u32 - 1).map(|i| (i, i + 1)).collect();
        TargetState::new(Graph::from_edges(n, &edges), 1, u32::MAX)
    }

    #[test]
    fn test_unweighted_distances_are_zero() {
        // With no overlaps every node weight is zero, so all reachable
        // nodes sit at distance zero and hops break the ties.
        let state = path_state(4);
        let mut scratch = DijkstraScratch::new(4);
        let mut out = DistanceField::new(4);
        shortest_paths(&mut scratch, &mut out, &state, 0, [0u32]);
        assert_eq!(out.dist, vec![0.0; 4]);
        assert_eq!(out.parent[0], NO_NODE);
        assert_eq!(out.parent[1], 0);
        assert_eq!(out.parent[3], 2);
    }

    #[test]
    fn test_occupied_nodes_cost_their_weight() {
        let mut state = path_state(4);
        state.uses[1] = 1;
        state.uses[2] = 2;
        state.set_beta(2.0);
        let mut scratch = DijkstraScratch::new(4);
        let mut out = DistanceField::new(4);
        shortest_paths(&mut scratch, &mut out, &state, 0, [0u32]);
        assert_eq!(out.dist[1], 1.0);
        assert_eq!(out.dist[2], 4.0);
        assert_eq!(out.dist[3], 4.0);
    }

    #[test]
    fn test_fill_cap_blocks_paths() {
        let mut state = TargetState::new(
            Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]),
            1,
            1,
        );
        state.uses[1] = 1;
        let mut scratch = DijkstraScratch::new(4);
        let mut out = DistanceField::new(4);
        shortest_paths(&mut scratch, &mut out, &state, 0, [0u32]);
        assert!(out.dist[1].is_infinite());
        assert!(out.dist[2].is_infinite());
    }

    #[test]
    fn test_multi_source_takes_nearest_seed() {
        let mut state = path_state(5);
        state.uses[1] = 1;
        state.set_beta(2.0);
        let mut scratch = DijkstraScratch::new(5);
        let mut out = DistanceField::new(5);
        shortest_paths(&mut scratch, &mut out, &state, 0, [0u32, 4u32]);
        // Node 2 is reachable for free from seed 4 via node 3.
        assert_eq!(out.dist[2], 0.0);
        assert_eq!(out.parent[2], 3);
    }

    #[test]
    fn test_hop_tiebreak_prefers_short_paths() {
        // Diamond: 0-1-3 and 0-2-3 plus direct 0-3; all weights zero.
        let graph = Graph::from_edges(4, &[(0, 1), (1, 3), (0, 2), (2, 3), (0, 3)]);
        let state = TargetState::new(graph, 1, u32::MAX);
        let mut scratch = DijkstraScratch::new(4);
        let mut out = DistanceField::new(4);
        shortest_paths(&mut scratch, &mut out, &state, 0, [0u32]);
        assert_eq!(out.parent[3], 0, "one hop beats two at equal distance");
    }
}
