//! Input graphs and label interning.
//!
//! The caller hands the engine edge lists over arbitrary hashable labels;
//! everything inside the engine runs on dense integer ids. [`LabelTable`]
//! is the insertion-ordered bidirectional mapping between the two worlds,
//! and [`Graph`] is the flat adjacency structure both the source and the
//! target graph use.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Insertion-ordered bidirectional mapping between user labels and dense ids.
///
/// Ids are assigned in first-seen order, which is what makes a run
/// reproducible: the same edge list always produces the same id assignment.
#[derive(Clone, Debug)]
pub struct LabelTable<L> {
    index: FxHashMap<L, u32>,
    labels: Vec<L>,
}

impl<L: Clone + Eq + Hash> LabelTable<L> {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            labels: Vec::new(),
        }
    }

    /// Returns the id for `label`, assigning the next free id on first sight.
    pub fn intern(&mut self, label: &L) -> u32 {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.labels.len() as u32;
        self.index.insert(label.clone(), id);
        self.labels.push(label.clone());
        id
    }

    /// The id previously assigned to `label`, if any.
    #[must_use]
    pub fn get(&self, label: &L) -> Option<u32> {
        self.index.get(label).copied()
    }

    /// The label behind `id`.
    #[must_use]
    pub fn label(&self, id: u32) -> &L {
        &self.labels[id as usize]
    }

    /// Number of interned labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<L: Clone + Eq + Hash> Default for LabelTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Undirected graph over dense ids `0..n`, stored as flat CSR adjacency.
///
/// Neighbor lists are sorted and deduplicated; self-loops are dropped at
/// construction. Sorted adjacency is load-bearing: every loop that iterates
/// neighbors does so in ascending id order, which is half of the engine's
/// determinism story.
#[derive(Clone, Debug)]
pub struct Graph {
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
}

impl Graph {
    /// Builds the graph from an edge list. Self-loops and duplicate edges
    /// are ignored.
    #[must_use]
    pub fn from_edges(num_nodes: usize, edges: &[(u32, u32)]) -> Self {
        let mut adjacency = vec![Vec::new(); num_nodes];
        for &(u, v) in edges {
            if u == v {
                continue;
            }
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }
        let mut offsets = Vec::with_capacity(num_nodes + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
            neighbors.extend_from_slice(list);
            offsets.push(neighbors.len() as u32);
        }
        Self { offsets, neighbors }
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// The sorted neighbor list of `v`.
    #[must_use]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        let lo = self.offsets[v as usize] as usize;
        let hi = self.offsets[v as usize + 1] as usize;
        &self.neighbors[lo..hi]
    }

    /// Degree of `v`.
    #[must_use]
    pub fn degree(&self, v: u32) -> usize {
        self.neighbors(v).len()
    }

    /// The largest degree over all nodes.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        (0..self.num_nodes() as u32)
            .map(|v| self.degree(v))
            .max()
            .unwrap_or(0)
    }

    /// Whether `u` and `v` are adjacent.
    #[must_use]
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Iterates each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.num_nodes() as u32).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}
