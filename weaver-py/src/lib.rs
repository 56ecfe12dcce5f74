//! Python bindings for the weaver-core minor-embedding engine.
//!
//! This module provides a thin PyO3 wrapper around
//! [`weaver_core::find_embedding`], accepting integer-labeled edge lists
//! and the same option set the Rust API takes.

use std::collections::HashMap;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use weaver_core::{EmbeddingError, EmbeddingOptions};

/// Heuristic minor-embedding of a source graph into a target graph.
///
/// This module wraps the weaver-core engine, a modernized implementation
/// of the Cai-Macready-Roy placement heuristic for quantum-annealer
/// hardware graphs.
#[pymodule]
fn _weaver(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_embedding, m)?)?;
    Ok(())
}

/// Find a minor embedding of one graph into another.
///
/// Parameters
/// ----------
/// source_edges : list[tuple[int, int]]
///     Edge list of the source graph.
/// target_edges : list[tuple[int, int]]
///     Edge list of the target graph.
/// max_no_improvement : int, optional
///     Bound on consecutive stalled passes per phase (default: 10).
/// random_seed : int, optional
///     Seed for the search RNG; fresh entropy when omitted.
/// timeout : float, optional
///     Wall-clock budget in seconds (default: 1000).
/// max_beta : float, optional
///     Upper bound on the overlap penalty base; must exceed 1.
/// tries : int, optional
///     Maximum number of restarts (default: 10).
/// inner_rounds : int, optional
///     Maximum passes per try (default: unbounded).
/// chainlength_patience : int, optional
///     Stall bound for the chain-shrinking phase (default: 10).
/// max_fill : int, optional
///     Cap on chains sharing one target node during search (default:
///     unbounded, clamped to 63).
/// threads : int, optional
///     Worker pool size (default: 1).
/// return_overlap : bool, optional
///     When true, return ``(mapping, success)`` instead of ``mapping``.
/// skip_initialization : bool, optional
///     Start from ``initial_chains`` without an initialization pass.
/// verbose : int, optional
///     Diagnostics level 0-4 (default: 0).
/// initial_chains : dict[int, list[int]], optional
///     Seed chains; overlaps are accepted.
/// fixed_chains : dict[int, list[int]], optional
///     Immutable chains, returned verbatim.
/// restrict_chains : dict[int, list[int]], optional
///     Per-source soft containment sets.
/// suspend_chains : dict[int, list[list[int]]], optional
///     Per-source blobs; the chain must touch every blob.
///
/// Returns
/// -------
/// dict[int, list[int]] or tuple[dict[int, list[int]], bool]
///     The chain for each embedded source node; with ``return_overlap``,
///     also whether the mapping is a proper embedding.
///
/// Raises
/// ------
/// ValueError
///     For out-of-range options or chain hints naming unknown nodes.
/// RuntimeError
///     If the engine breaks an internal invariant.
#[pyfunction]
#[pyo3(signature = (
    source_edges,
    target_edges,
    *,
    max_no_improvement = 10,
    random_seed = None,
    timeout = 1000.0,
    max_beta = None,
    tries = 10,
    inner_rounds = None,
    chainlength_patience = 10,
    max_fill = None,
    threads = 1,
    return_overlap = false,
    skip_initialization = false,
    verbose = 0,
    initial_chains = None,
    fixed_chains = None,
    restrict_chains = None,
    suspend_chains = None,
))]
#[allow(clippy::too_many_arguments)]
fn find_embedding(
    py: Python<'_>,
    source_edges: Vec<(i64, i64)>,
    target_edges: Vec<(i64, i64)>,
    max_no_improvement: u32,
    random_seed: Option<u64>,
    timeout: f64,
    max_beta: Option<f64>,
    tries: u32,
    inner_rounds: Option<u32>,
    chainlength_patience: u32,
    max_fill: Option<u32>,
    threads: usize,
    return_overlap: bool,
    skip_initialization: bool,
    verbose: u8,
    initial_chains: Option<HashMap<i64, Vec<i64>>>,
    fixed_chains: Option<HashMap<i64, Vec<i64>>>,
    restrict_chains: Option<HashMap<i64, Vec<i64>>>,
    suspend_chains: Option<HashMap<i64, Vec<Vec<i64>>>>,
) -> PyResult<PyObject> {
    let options = EmbeddingOptions {
        max_no_improvement,
        random_seed,
        timeout,
        max_beta: max_beta.unwrap_or(f64::INFINITY),
        tries,
        inner_rounds: inner_rounds.unwrap_or(u32::MAX),
        chainlength_patience,
        max_fill: max_fill.unwrap_or(u32::MAX),
        threads,
        return_overlap,
        skip_initialization,
        verbose,
        initial_chains: initial_chains.unwrap_or_default(),
        fixed_chains: fixed_chains.unwrap_or_default(),
        restrict_chains: restrict_chains.unwrap_or_default(),
        suspend_chains: suspend_chains.unwrap_or_default(),
        cancel: Default::default(),
    };

    let embedding = weaver_core::find_embedding(source_edges, target_edges, &options)
        .map_err(to_py_err)?;

    let mapping = PyDict::new_bound(py);
    for (source, chain) in &embedding.chains {
        mapping.set_item(source, chain.clone())?;
    }
    if return_overlap {
        Ok((mapping, embedding.valid).into_py(py))
    } else {
        Ok(mapping.into_py(py))
    }
}

fn to_py_err(err: EmbeddingError) -> PyErr {
    match err {
        EmbeddingError::Internal(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}
