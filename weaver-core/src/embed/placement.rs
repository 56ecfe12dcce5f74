//! Placing one source vertex: neighbor distances, root selection, and path
//! reconstruction.
//!
//! With the vertex's old chain torn down, each placed source neighbor `u`
//! contributes a distance field from `chain(u)` to every target node. The
//! node minimizing the summed distances becomes the new chain's root, and
//! the union of the cheapest paths from the root back to each neighbor
//! chain becomes the new chain.
//!
//! The per-neighbor distance computations are independent, so with two or
//! more placed neighbors and a worker pool they run in parallel; the
//! results are joined in neighbor order, which keeps root selection
//! independent of task completion order.

use std::mem;

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::embed::dijkstra::shortest_paths;
use crate::embed::search::Embedder;

/// Saturation value standing in for "unreachable from this neighbor" when
/// scores are summed: large enough to dominate every real distance, small
/// enough that a root reachable from only some neighbors still beats one
/// reachable from none.
const UNREACHED: f64 = 1e200;

/// The placement heuristic, implemented on the search engine.
pub(crate) trait Placement {
    /// Computes a new chain for `v` and installs it. Leaves `chain(v)`
    /// empty when no target node is usable.
    fn place_vertex(&mut self, v: u32);

    /// Runs one shortest-path computation per entry of `nbrs`, filling
    /// `fields[..nbrs.len()]`; dispatches to the worker pool when it pays.
    fn compute_neighbor_fields(&mut self, v: u32, nbrs: &[u32]);

    /// Picks the root minimizing the summed neighbor distances over the
    /// first `k` fields, plus the root's own entry cost for `v`; ties
    /// collect in id order and an RNG draw decides.
    fn select_root(&mut self, v: u32, k: usize) -> Option<u32>;

    /// Picks an anchor for a vertex with no placed neighbors: uniformly at
    /// random among permitted nodes, preferring unused ones.
    fn cold_start(&mut self, v: u32) -> Option<u32>;
}

impl Placement for Embedder {
    fn place_vertex(&mut self, v: u32) {
        debug_assert!(self.chains.chain(v).is_empty(), "tear before placing");

        let mut nbrs = mem::take(&mut self.nbr_buf);
        nbrs.clear();
        nbrs.extend(
            self.source
                .neighbors(v)
                .iter()
                .copied()
                .filter(|&u| !self.chains.chain(u).is_empty()),
        );

        if nbrs.is_empty() {
            if let Some(anchor) = self.cold_start(v) {
                self.chains
                    .install(v, anchor, &[vec![anchor]], &mut self.target);
            }
            self.nbr_buf = nbrs;
            return;
        }

        self.compute_neighbor_fields(v, &nbrs);

        // Cancellation point between the distance phase and root selection.
        if self.should_stop() {
            self.nbr_buf = nbrs;
            return;
        }

        let Some(root) = self.select_root(v, nbrs.len()) else {
            self.nbr_buf = nbrs;
            return;
        };

        let mut paths: Vec<Vec<u32>> = Vec::with_capacity(nbrs.len());
        for (i, &u) in nbrs.iter().enumerate() {
            let field = &self.fields[i];
            if !field.dist[root as usize].is_finite() {
                // This neighbor cannot reach the root; the edge (u, v) stays
                // violated for now and the outer loop will see it.
                continue;
            }
            let chain_u = self.chains.chain(u);
            let mut path = vec![root];
            let mut cur = root;
            loop {
                let parent = field.parent[cur as usize];
                if parent == crate::embed::chains::NO_NODE || chain_u.contains(parent) {
                    break;
                }
                path.push(parent);
                cur = parent;
            }
            paths.push(path);
        }
        self.chains.install(v, root, &paths, &mut self.target);
        self.nbr_buf = nbrs;
    }

    fn compute_neighbor_fields(&mut self, v: u32, nbrs: &[u32]) {
        let Embedder {
            target,
            chains,
            fields,
            scratch,
            pool,
            ..
        } = self;
        let target = &*target;
        let chains = &*chains;
        let scratch = &*scratch;
        let slots = &mut fields[..nbrs.len()];

        match pool {
            Some(pool) if nbrs.len() >= 2 => {
                pool.install(|| {
                    slots.par_iter_mut().zip(nbrs).for_each(|(slot, &u)| {
                        let mut buf = scratch.take();
                        shortest_paths(&mut buf, slot, target, v, chains.chain(u).iter());
                        scratch.put(buf);
                    });
                });
            }
            _ => {
                for (slot, &u) in slots.iter_mut().zip(nbrs) {
                    let mut buf = scratch.take();
                    shortest_paths(&mut buf, slot, target, v, chains.chain(u).iter());
                    scratch.put(buf);
                }
            }
        }
    }

    fn select_root(&mut self, v: u32, k: usize) -> Option<u32> {
        let mut ties = mem::take(&mut self.tie_buf);
        ties.clear();
        let mut best = f64::INFINITY;
        for t in 0..self.target.num_nodes() as u32 {
            // The root's own entry cost is charged once; in the distance
            // fields the neighbor chains' own nodes sit at zero.
            let mut score = self.target.cost_into(v, t);
            if !score.is_finite() {
                continue;
            }
            for field in &self.fields[..k] {
                score += field.dist[t as usize].min(UNREACHED);
            }
            if score < best {
                best = score;
                ties.clear();
                ties.push(t);
            } else if score == best {
                ties.push(t);
            }
        }
        // A root no neighbor can reach is no root at all.
        let choice = if ties.is_empty() || best >= k as f64 * UNREACHED {
            None
        } else {
            Some(ties[self.rng.gen_range(0..ties.len())])
        };
        self.tie_buf = ties;
        choice
    }

    fn cold_start(&mut self, v: u32) -> Option<u32> {
        let mut ties = mem::take(&mut self.tie_buf);
        ties.clear();
        // Permitted and unused first, then permitted, then anything open.
        for relaxation in 0..3 {
            for t in 0..self.target.num_nodes() as u32 {
                if self.target.uses[t as usize] >= self.target.max_fill()
                    || self.target.is_reserved(t)
                {
                    continue;
                }
                let ok = match relaxation {
                    0 => self.target.permitted(v, t) && self.target.uses[t as usize] == 0,
                    1 => self.target.permitted(v, t),
                    _ => true,
                };
                if ok {
                    ties.push(t);
                }
            }
            if !ties.is_empty() {
                break;
            }
        }
        let choice = ties.choose(&mut self.rng).copied();
        self.tie_buf = ties;
        choice
    }
}
