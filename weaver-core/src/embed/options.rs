//! Configuration for [`find_embedding`](crate::find_embedding).
//!
//! All knobs live on [`EmbeddingOptions`]; every field has the documented
//! default, so `EmbeddingOptions::default()` is a complete, valid
//! configuration. Validation runs eagerly, before any heuristic work.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::EmbeddingError;

/// Cooperative cancellation flag.
///
/// The engine polls the token between passes and between the
/// neighbor-distance phase and root selection of each placement. Firing it
/// makes the current call return its best-so-far embedding promptly; it does
/// not abort in-flight shortest-path computations (they are small).
///
/// Clones share the underlying flag, so the caller can keep one clone and
/// hand the other to the options.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    fired: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, unfired token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.fired.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::Relaxed)
    }
}

/// Options accepted by [`find_embedding`](crate::find_embedding).
///
/// `L` is the caller's node label type, shared with the input edge lists.
#[derive(Clone, Debug)]
pub struct EmbeddingOptions<L> {
    /// Bound on consecutive stalled passes per phase. Default 10.
    pub max_no_improvement: u32,
    /// Seed for the search RNG. `None` draws fresh OS entropy. Default `None`.
    pub random_seed: Option<u64>,
    /// Wall-clock budget in seconds. Default 1000.
    pub timeout: f64,
    /// Upper bound on the overlap penalty base β; must be greater than 1.
    /// Default +∞.
    pub max_beta: f64,
    /// Maximum number of full restarts. Default 10.
    pub tries: u32,
    /// Maximum passes per try. Default effectively unbounded.
    pub inner_rounds: u32,
    /// Stall bound for the chainlength-reduction phase. Default 10.
    pub chainlength_patience: u32,
    /// Hard cap on how many chains may stack on one target node during
    /// search; clamped to 63 internally. Default effectively unbounded.
    pub max_fill: u32,
    /// Worker pool size for the neighbor-distance phase. Default 1.
    pub threads: usize,
    /// When set, the result's `valid` flag is also surfaced by the Python
    /// facade as a second return value. The Rust result always carries it.
    pub return_overlap: bool,
    /// Skip the initialization pass and start from `initial_chains` as a
    /// semi-valid embedding. Default off.
    pub skip_initialization: bool,
    /// Diagnostics level 0-4; higher levels emit more through the `log`
    /// crate. Default 0.
    pub verbose: u8,
    /// Seed chains, installed verbatim before the search; overlaps are
    /// accepted.
    pub initial_chains: HashMap<L, Vec<L>>,
    /// Immutable chains; they occupy their target nodes for the whole run
    /// and are returned verbatim.
    pub fixed_chains: HashMap<L, Vec<L>>,
    /// Per-source soft containment set: the engine only leaves the set under
    /// penalty pressure. An absent or empty entry means unconstrained.
    pub restrict_chains: HashMap<L, Vec<L>>,
    /// Per-source list of blobs; the final chain must touch every blob.
    pub suspend_chains: HashMap<L, Vec<Vec<L>>>,
    /// Cooperative cancellation token.
    pub cancel: CancelToken,
}

impl<L> Default for EmbeddingOptions<L> {
    fn default() -> Self {
        Self {
            max_no_improvement: 10,
            random_seed: None,
            timeout: 1000.0,
            max_beta: f64::INFINITY,
            tries: 10,
            inner_rounds: u32::MAX,
            chainlength_patience: 10,
            max_fill: u32::MAX,
            threads: 1,
            return_overlap: false,
            skip_initialization: false,
            verbose: 0,
            initial_chains: HashMap::new(),
            fixed_chains: HashMap::new(),
            restrict_chains: HashMap::new(),
            suspend_chains: HashMap::new(),
            cancel: CancelToken::new(),
        }
    }
}

impl<L: Clone + Eq + Hash + Debug> EmbeddingOptions<L> {
    /// Checks every scalar option against its documented range.
    pub(crate) fn validate(&self) -> Result<(), EmbeddingError> {
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(EmbeddingError::OptionOutOfRange {
                name: "timeout",
                reason: format!("must be a positive finite number, got {}", self.timeout),
            });
        }
        if !(self.max_beta > 1.0) {
            return Err(EmbeddingError::OptionOutOfRange {
                name: "max_beta",
                reason: format!("must be greater than 1, got {}", self.max_beta),
            });
        }
        if self.threads < 1 {
            return Err(EmbeddingError::OptionOutOfRange {
                name: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.verbose > 4 {
            return Err(EmbeddingError::OptionOutOfRange {
                name: "verbose",
                reason: format!("must be between 0 and 4, got {}", self.verbose),
            });
        }
        Ok(())
    }
}

/// Scalar options after validation and clamping, free of the label type.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedOptions {
    pub max_no_improvement: u32,
    pub timeout: Duration,
    pub max_beta: f64,
    pub tries: u32,
    pub inner_rounds: u32,
    pub chainlength_patience: u32,
    pub max_fill: u32,
    pub threads: usize,
    pub skip_initialization: bool,
    pub verbose: u8,
    pub seed: u64,
}

impl ResolvedOptions {
    /// Clamps and copies the scalar knobs; `seed` is the materialized RNG
    /// seed (drawn from entropy when the caller did not provide one).
    pub(crate) fn from_options<L>(opts: &EmbeddingOptions<L>, seed: u64) -> Self {
        Self {
            max_no_improvement: opts.max_no_improvement,
            timeout: Duration::from_secs_f64(opts.timeout),
            max_beta: opts.max_beta,
            tries: opts.tries,
            inner_rounds: opts.inner_rounds,
            chainlength_patience: opts.chainlength_patience,
            max_fill: opts.max_fill.min(63),
            threads: opts.threads,
            skip_initialization: opts.skip_initialization,
            verbose: opts.verbose,
            seed,
        }
    }
}
