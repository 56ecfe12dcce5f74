//! The outer search loop: tear-and-rebuild passes, phase scheduling, β
//! growth, restarts, and the best-so-far snapshot.
//!
//! The loop runs three phases per try. Initialization places every empty
//! chain once. Embedding search sweeps the source vertices - tearing and
//! re-placing each chain - while β grows to squeeze overlaps out.
//! Chainlength reduction keeps sweeping a proper embedding, now pruning
//! after every placement, and only the quality key decides what is kept.
//!
//! All randomness flows through one seeded generator; all iteration is in
//! id or shuffled-id order. With one worker thread the whole trajectory is
//! a pure function of the seed.

use std::collections::BTreeMap;
use std::mem;
use std::time::Instant;

use log::{debug, info, trace};
use rand::seq::SliceRandom;

use crate::embed::chains::{Chain, ChainStore};
use crate::embed::dijkstra::{DistanceField, ScratchPool};
use crate::embed::options::{CancelToken, ResolvedOptions};
use crate::embed::placement::Placement;
use crate::embed::setup::Problem;
use crate::embed::target::TargetState;
use crate::error::EmbeddingError;
use crate::graph::Graph;
use crate::rng::{self, SearchRng};

/// Comparable quality of an embedding attempt; lexicographically smaller is
/// better.
///
/// `state` dominates: 2 while any chain is empty, 1 while the embedding is
/// overlapped, misses a source edge, or violates a restrict set, 0 when
/// proper. The histograms are
/// `(value, count)` pairs sorted by value descending, so comparing them
/// flattened punishes the worst overlap (respectively the longest chain)
/// first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualityKey {
    /// 2 = empty, 1 = not yet proper, 0 = proper.
    pub state: u8,
    /// Histogram of target-node use counts of 2 or more.
    pub overlap_hist: Vec<(u32, u32)>,
    /// Histogram of nonempty chain lengths.
    pub length_hist: Vec<(u32, u32)>,
}

/// Best embedding seen so far, replaced only by a strictly better key.
struct BestSnapshot {
    key: QualityKey,
    chains: Vec<Chain>,
}

/// One embedding search over a fully dense-id problem.
pub(crate) struct Embedder {
    pub(crate) source: Graph,
    pub(crate) target: TargetState,
    pub(crate) chains: ChainStore,
    pub(crate) opts: ResolvedOptions,
    pub(crate) rng: SearchRng,
    pub(crate) pool: Option<rayon::ThreadPool>,
    pub(crate) scratch: ScratchPool,
    /// One distance field per source neighbor, reused across placements.
    pub(crate) fields: Vec<DistanceField>,
    /// Reusable buffers for the placement heuristic.
    pub(crate) nbr_buf: Vec<u32>,
    pub(crate) tie_buf: Vec<u32>,
    visit_order: Vec<u32>,
    initial: Vec<(u32, Vec<u32>)>,
    deadline: Instant,
    cancel: CancelToken,
    best: Option<BestSnapshot>,
    pub(crate) stopped: bool,
}

impl Embedder {
    /// Builds the engine from a prepared problem: installs fixed chains and
    /// pins, sizes every scratch buffer, and spins up the worker pool.
    pub(crate) fn new(problem: Problem) -> Result<Self, EmbeddingError> {
        let Problem {
            source,
            target,
            fixed,
            initial,
            restrict,
            reserved,
            opts,
            cancel,
        } = problem;

        let num_sources = source.num_nodes();
        let num_targets = target.num_nodes();

        let mut target = TargetState::new(target, num_sources, opts.max_fill);
        for (v, allowed) in &restrict {
            target.set_restrict(*v, allowed);
        }
        for &t in &reserved {
            target.reserve(t);
        }

        let mut chains = ChainStore::new(num_sources);
        for (v, members) in &fixed {
            if !chains.adopt(*v, members, &mut target) {
                return Err(EmbeddingError::Internal(format!(
                    "fixed chain for source {v} failed to install"
                )));
            }
            chains.mark_fixed(*v);
        }

        let pool = if opts.threads > 1 {
            let built = rayon::ThreadPoolBuilder::new()
                .num_threads(opts.threads)
                .build()
                .map_err(|e| EmbeddingError::Internal(format!("worker pool: {e}")))?;
            Some(built)
        } else {
            None
        };

        let max_degree = source.max_degree();
        let fields = (0..max_degree)
            .map(|_| DistanceField::new(num_targets))
            .collect();

        Ok(Self {
            source,
            target,
            chains,
            rng: rng::seeded(opts.seed),
            scratch: ScratchPool::new(opts.threads, num_targets),
            pool,
            fields,
            nbr_buf: Vec::new(),
            tie_buf: Vec::new(),
            visit_order: Vec::new(),
            initial,
            deadline: Instant::now() + opts.timeout,
            cancel,
            best: None,
            stopped: false,
            opts,
        })
    }

    /// Runs the full search: up to `tries` restarts of initialization and
    /// embedding search, then one chainlength-reduction phase once a proper
    /// embedding exists.
    pub(crate) fn run(&mut self) {
        for try_index in 0..self.opts.tries {
            if self.should_stop() {
                break;
            }
            self.start_try(try_index);

            if !(self.opts.skip_initialization && try_index == 0) {
                self.initialization_pass();
            }
            let key = self.evaluate();
            if self.opts.verbose >= 1 {
                info!(
                    "try {try_index}: initialized, state {} with {} overlapped nodes",
                    key.state,
                    key.overlap_hist.iter().map(|&(_, c)| c).sum::<u32>()
                );
            }
            let mut proper = key.state == 0;
            self.consider_best(key);

            let mut stalls = 0u32;
            let mut rounds = 0u32;
            while !proper
                && stalls < self.opts.max_no_improvement
                && rounds < self.opts.inner_rounds
                && !self.should_stop()
            {
                self.sweep(false);
                rounds += 1;
                let key = self.evaluate();
                proper = key.state == 0;
                if self.opts.verbose >= 2 {
                    debug!(
                        "try {try_index} pass {rounds}: state {}, beta {:.1}",
                        key.state,
                        self.target.beta()
                    );
                }
                if self.consider_best(key) {
                    stalls = 0;
                } else {
                    stalls += 1;
                }
                if !proper {
                    let beta = (self.target.beta() * 2.0).min(self.opts.max_beta);
                    self.target.set_beta(beta);
                }
            }

            if proper || self.best_is_proper() {
                self.reduce_chainlengths();
                break;
            }
        }

        if self.best.is_none() {
            let key = self.evaluate();
            self.consider_best(key);
        }
    }

    /// Consumes the engine, returning the best chains, the per-source fixed
    /// flags, and whether the chains form a proper embedding.
    pub(crate) fn finish(mut self) -> (Vec<Chain>, Vec<bool>, bool) {
        match self.best.take() {
            Some(best) => (best.chains, self.chains.fixed, best.key.state == 0),
            None => {
                let key = self.evaluate();
                let valid = key.state == 0;
                (self.chains.snapshot(), self.chains.fixed, valid)
            }
        }
    }

    /// Resets the working state for a (re)start: β back to its floor, all
    /// non-fixed chains torn, initial chains re-seeded.
    fn start_try(&mut self, try_index: u32) {
        self.target.set_beta(2.0);
        for v in 0..self.chains.num_sources() as u32 {
            self.chains.tear(v, &mut self.target);
        }
        let initial = mem::take(&mut self.initial);
        for (v, members) in &initial {
            if !self.chains.fixed[*v as usize] {
                let _ = self.chains.adopt(*v, members, &mut self.target);
            }
        }
        self.initial = initial;
        if try_index > 0 && self.opts.verbose >= 1 {
            info!("restart {try_index}");
        }
    }

    /// Phase (i): place every empty, non-fixed chain once, in random order.
    fn initialization_pass(&mut self) {
        let mut order = mem::take(&mut self.visit_order);
        self.collect_movable(&mut order);
        order.shuffle(&mut self.rng);
        for &v in &order {
            if self.stopped {
                break;
            }
            if self.chains.chain(v).is_empty() {
                self.place_vertex(v);
            }
        }
        self.visit_order = order;
    }

    /// One pass over the movable source vertices: tear, re-place, and (in
    /// the reduction phase) prune each chain.
    fn sweep(&mut self, reduce: bool) {
        let mut order = mem::take(&mut self.visit_order);
        self.collect_movable(&mut order);
        order.shuffle(&mut self.rng);
        for &v in &order {
            if self.stopped {
                break;
            }
            if self.opts.verbose >= 4 {
                trace!("re-placing source {v}");
            }
            self.chains.tear(v, &mut self.target);
            self.place_vertex(v);
            if reduce {
                self.chains.prune(v, &self.source, &mut self.target);
            }
        }
        self.visit_order = order;
    }

    /// Phase (iii): restore the best proper embedding and keep sweeping
    /// with pruning until `chainlength_patience` passes bring no strictly
    /// better length vector.
    fn reduce_chainlengths(&mut self) {
        if let Some(best) = &self.best {
            if best.key.state == 0 {
                let snapshot = best.chains.clone();
                self.chains.restore(&snapshot, &mut self.target);
            }
        }
        if self.opts.verbose >= 1 {
            info!("proper embedding found, reducing chain lengths");
        }
        let mut patience = 0u32;
        while patience < self.opts.chainlength_patience && !self.should_stop() {
            self.sweep(true);
            let key = self.evaluate();
            if self.opts.verbose >= 2 {
                debug!(
                    "reduction pass: state {}, longest chain {}",
                    key.state,
                    key.length_hist.first().map_or(0, |&(len, _)| len)
                );
            }
            if self.consider_best(key) {
                patience = 0;
            } else {
                patience += 1;
            }
        }
    }

    /// Fills `order` with the non-fixed source vertices.
    fn collect_movable(&self, order: &mut Vec<u32>) {
        order.clear();
        order.extend(
            (0..self.chains.num_sources() as u32).filter(|&v| !self.chains.fixed[v as usize]),
        );
    }

    /// Scores the current working embedding.
    pub(crate) fn evaluate(&self) -> QualityKey {
        let num_sources = self.chains.num_sources() as u32;
        let any_empty = (0..num_sources).any(|v| self.chains.chain(v).is_empty());
        let overlapped = self.target.max_overlap() > 1;
        let covered = !any_empty && self.edges_covered();
        // A chain outside its restrict set keeps the embedding improper.
        let restricted_ok = (0..num_sources).all(|v| {
            !self.target.is_restricted(v)
                || self
                    .chains
                    .chain(v)
                    .iter()
                    .all(|t| self.target.permitted(v, t))
        });
        let state = if any_empty {
            2
        } else if overlapped || !covered || !restricted_ok {
            1
        } else {
            0
        };

        let mut overlap_counts: BTreeMap<u32, u32> = BTreeMap::new();
        for &u in &self.target.uses {
            if u >= 2 {
                *overlap_counts.entry(u).or_insert(0) += 1;
            }
        }
        let mut length_counts: BTreeMap<u32, u32> = BTreeMap::new();
        for v in 0..num_sources {
            let len = self.chains.chain(v).len() as u32;
            if len > 0 {
                *length_counts.entry(len).or_insert(0) += 1;
            }
        }
        QualityKey {
            state,
            overlap_hist: overlap_counts.into_iter().rev().collect(),
            length_hist: length_counts.into_iter().rev().collect(),
        }
    }

    /// Whether every source edge is witnessed by a target edge between the
    /// two chains.
    fn edges_covered(&self) -> bool {
        for (u, v) in self.source.edges() {
            let cu = self.chains.chain(u);
            let cv = self.chains.chain(v);
            if cu.is_empty() || cv.is_empty() {
                return false;
            }
            // Scan the smaller chain's neighborhoods against the larger.
            let (probe, other) = if cu.len() <= cv.len() { (cu, cv) } else { (cv, cu) };
            let witnessed = probe.iter().any(|q| {
                self.target
                    .graph
                    .neighbors(q)
                    .iter()
                    .any(|&p| other.contains(p))
            });
            if !witnessed {
                return false;
            }
        }
        true
    }

    /// Replaces the best snapshot if `key` is strictly better. Returns
    /// whether it was.
    fn consider_best(&mut self, key: QualityKey) -> bool {
        let improved = match &self.best {
            Some(best) => key < best.key,
            None => true,
        };
        if improved {
            self.best = Some(BestSnapshot {
                key,
                chains: self.chains.snapshot(),
            });
        }
        improved
    }

    fn best_is_proper(&self) -> bool {
        self.best.as_ref().map_or(false, |b| b.key.state == 0)
    }

    /// Polls the deadline and the cancellation token; once either fires the
    /// engine stays stopped.
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.cancel.is_cancelled() || Instant::now() >= self.deadline {
            self.stopped = true;
        }
        self.stopped
    }
}
