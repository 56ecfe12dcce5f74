//! Shared helpers for the integration tests: small graph builders and an
//! independent embedding checker.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use weaver_core::Embedding;

/// Edge list of the complete graph on labels `0..n`.
pub fn complete_graph(n: i32) -> Vec<(i32, i32)> {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            edges.push((u, v));
        }
    }
    edges
}

/// Edge list of the path on labels `0..n`.
pub fn path_graph(n: i32) -> Vec<(i32, i32)> {
    (0..n - 1).map(|i| (i, i + 1)).collect()
}

/// Edge list of the cycle on labels `0..n`.
pub fn cycle_graph(n: i32) -> Vec<(i32, i32)> {
    let mut edges = path_graph(n);
    edges.push((n - 1, 0));
    edges
}

/// Edge list of the complete bipartite graph with parts `0..a` and
/// `a..a + b`.
pub fn complete_bipartite(a: i32, b: i32) -> Vec<(i32, i32)> {
    let mut edges = Vec::new();
    for u in 0..a {
        for v in a..(a + b) {
            edges.push((u, v));
        }
    }
    edges
}

/// Edge list of the `w` by `h` grid graph, labeled row-major from 0.
pub fn grid_graph(w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let id = y * w + x;
            if x + 1 < w {
                edges.push((id, id + 1));
            }
            if y + 1 < h {
                edges.push((id, id + w));
            }
        }
    }
    edges
}

/// Checks, independently of the engine, that `embedding` is internally
/// consistent: every chain is connected in the target graph, and when
/// `valid` is set the chains are disjoint and every source edge is
/// witnessed by a target edge.
pub fn verify_embedding(
    source_edges: &[(i32, i32)],
    target_edges: &[(i32, i32)],
    embedding: &Embedding<i32>,
) {
    let mut adjacency: HashMap<i32, HashSet<i32>> = HashMap::new();
    for &(u, v) in target_edges {
        adjacency.entry(u).or_default().insert(v);
        adjacency.entry(v).or_default().insert(u);
    }

    // Chain connectivity.
    for (source, chain) in &embedding.chains {
        assert!(!chain.is_empty(), "chain for {source} must be nonempty");
        let members: HashSet<i32> = chain.iter().copied().collect();
        let mut reached = HashSet::new();
        let mut frontier = vec![chain[0]];
        reached.insert(chain[0]);
        while let Some(q) = frontier.pop() {
            if let Some(nbrs) = adjacency.get(&q) {
                for &p in nbrs {
                    if members.contains(&p) && reached.insert(p) {
                        frontier.push(p);
                    }
                }
            }
        }
        assert_eq!(
            reached.len(),
            members.len(),
            "chain for {source} is not connected: {chain:?}"
        );
    }

    if !embedding.valid {
        return;
    }

    // Disjointness.
    let mut owner: HashMap<i32, i32> = HashMap::new();
    for (&source, chain) in &embedding.chains {
        for &t in chain {
            if let Some(prev) = owner.insert(t, source) {
                panic!("chains for {prev} and {source} share target {t}");
            }
        }
    }

    // Edge coverage.
    for &(u, v) in source_edges {
        if u == v {
            continue;
        }
        let cu = embedding
            .chains
            .get(&u)
            .unwrap_or_else(|| panic!("no chain for source {u}"));
        let cv = embedding
            .chains
            .get(&v)
            .unwrap_or_else(|| panic!("no chain for source {v}"));
        let witnessed = cu.iter().any(|q| {
            adjacency
                .get(q)
                .is_some_and(|nbrs| cv.iter().any(|p| nbrs.contains(p)))
        });
        assert!(witnessed, "source edge ({u}, {v}) is not witnessed");
    }
}
