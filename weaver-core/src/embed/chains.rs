//! Chain bookkeeping: which target nodes each source vertex owns, and the
//! tree structure inside each chain.
//!
//! A chain is a connected set of target nodes with a spanning tree encoded
//! as parent pointers rooted at the chain's anchor. The tree is what makes
//! shrinking cheap: leaves (tree nodes with no children) can be dropped
//! without disconnecting the chain, and the reference counts kept per member
//! identify leaves in O(1).
//!
//! The store also owns the coupling to the target-side use counts: every
//! install, tear, and prune keeps `TargetState::uses` exact.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::embed::target::TargetState;
use crate::graph::Graph;

/// Sentinel for "no target node".
pub const NO_NODE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct ChainNode {
    /// Parent in the chain tree; the anchor is its own parent.
    parent: u32,
    /// Number of tree children. Zero means leaf.
    refs: u32,
}

/// One source vertex's chain: members in insertion order plus the parent
/// tree over them.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    order: Vec<u32>,
    nodes: FxHashMap<u32, ChainNode>,
}

impl Chain {
    /// True when the chain holds no target nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of target nodes in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// The tree root, or `None` for an empty chain.
    #[must_use]
    pub fn anchor(&self) -> Option<u32> {
        self.order.first().copied()
    }

    /// Whether `t` belongs to the chain.
    #[must_use]
    pub fn contains(&self, t: u32) -> bool {
        self.nodes.contains_key(&t)
    }

    /// The tree parent of `t` (the anchor is its own parent).
    #[must_use]
    pub fn parent(&self, t: u32) -> Option<u32> {
        self.nodes.get(&t).map(|n| n.parent)
    }

    /// Members in insertion order (anchor first).
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.order.iter().copied()
    }

    fn refs(&self, t: u32) -> u32 {
        self.nodes[&t].refs
    }

    fn insert(&mut self, t: u32, parent: u32) {
        debug_assert!(!self.contains(t));
        self.nodes.insert(t, ChainNode { parent, refs: 0 });
        if parent != t {
            self.nodes
                .get_mut(&parent)
                .expect("parent must precede child")
                .refs += 1;
        }
        self.order.push(t);
    }

    fn remove_leaf(&mut self, t: u32) {
        let node = self.nodes.remove(&t).expect("leaf must be a member");
        debug_assert_eq!(node.refs, 0, "only leaves can be removed");
        if node.parent != t {
            if let Some(parent) = self.nodes.get_mut(&node.parent) {
                parent.refs -= 1;
            }
        }
        self.order.retain(|&q| q != t);
    }

    fn clear(&mut self) {
        self.order.clear();
        self.nodes.clear();
    }

    /// Verifies the chain-connectivity invariant: every member reaches the
    /// anchor through parent pointers, and every parent link is a target
    /// edge.
    #[must_use]
    pub fn is_connected(&self, target: &Graph) -> bool {
        let Some(anchor) = self.anchor() else {
            return true;
        };
        for &t in &self.order {
            let mut cur = t;
            let mut steps = 0;
            while cur != anchor {
                let Some(parent) = self.parent(cur) else {
                    return false;
                };
                if parent != cur && !target.has_edge(cur, parent) {
                    return false;
                }
                if parent == cur || steps > self.order.len() {
                    return false;
                }
                cur = parent;
                steps += 1;
            }
        }
        true
    }
}

/// All chains of the current (possibly overlapped) embedding, indexed by
/// source vertex id.
pub struct ChainStore {
    chains: Vec<Chain>,
    /// Chains that are never torn or pruned: fixed chains and suspension
    /// pins.
    pub fixed: Vec<bool>,
}

impl ChainStore {
    /// An empty store for `num_sources` source vertices.
    #[must_use]
    pub fn new(num_sources: usize) -> Self {
        Self {
            chains: vec![Chain::default(); num_sources],
            fixed: vec![false; num_sources],
        }
    }

    /// Number of source vertices.
    #[must_use]
    pub fn num_sources(&self) -> usize {
        self.chains.len()
    }

    /// The chain of source vertex `v`.
    #[must_use]
    pub fn chain(&self, v: u32) -> &Chain {
        &self.chains[v as usize]
    }

    /// Replaces `chain(v)` with the union of `paths`, each a target-node
    /// sequence starting at `root`. The tree is rooted at `root`; use counts
    /// are adjusted for every node leaving or entering the chain.
    ///
    /// A node appearing in several paths keeps the parent from the first
    /// path that reached it; later paths connect to it instead of re-rooting
    /// it, which keeps the parent map a spanning tree.
    pub fn install(&mut self, v: u32, root: u32, paths: &[Vec<u32>], target: &mut TargetState) {
        debug_assert!(!self.fixed[v as usize], "fixed chains are immutable");
        self.tear(v, target);
        let chain = &mut self.chains[v as usize];
        chain.insert(root, root);
        target.uses[root as usize] += 1;
        for path in paths {
            debug_assert_eq!(path.first(), Some(&root), "paths must start at the root");
            for pair in path.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                if !chain.contains(to) {
                    chain.insert(to, from);
                    target.uses[to as usize] += 1;
                }
            }
        }
    }

    /// Empties `chain(v)`, decrementing use counts. A no-op for fixed and
    /// pinned chains.
    pub fn tear(&mut self, v: u32, target: &mut TargetState) {
        if self.fixed[v as usize] {
            return;
        }
        let chain = &mut self.chains[v as usize];
        for &t in &chain.order {
            target.uses[t as usize] -= 1;
        }
        chain.clear();
    }

    /// Drops removable leaves from `chain(v)` until none remain.
    ///
    /// A leaf is removable when, for every source neighbor of `v` with a
    /// nonempty chain, the rest of the chain still touches that neighbor's
    /// chain (shares a node with it, or is target-adjacent to it). The
    /// anchor is never removed.
    pub fn prune(&mut self, v: u32, source: &Graph, target: &mut TargetState) {
        if self.fixed[v as usize] {
            return;
        }
        loop {
            let candidate = {
                let chain = &self.chains[v as usize];
                let anchor = chain.anchor();
                chain
                    .order
                    .iter()
                    .copied()
                    .find(|&t| {
                        chain.refs(t) == 0
                            && Some(t) != anchor
                            && self.leaf_removable(v, t, source, &target.graph)
                    })
            };
            match candidate {
                Some(t) => {
                    self.chains[v as usize].remove_leaf(t);
                    target.uses[t as usize] -= 1;
                }
                None => break,
            }
        }
    }

    /// Whether dropping leaf `t` from `chain(v)` preserves contact with
    /// every placed neighbor chain.
    fn leaf_removable(&self, v: u32, t: u32, source: &Graph, target: &Graph) -> bool {
        let chain = &self.chains[v as usize];
        for &u in source.neighbors(v) {
            let other = &self.chains[u as usize];
            if other.is_empty() {
                continue;
            }
            if !Self::contact(t, other, target) {
                continue;
            }
            // `t` currently serves neighbor `u`; some other member must too.
            let alternative = chain
                .iter()
                .any(|m| m != t && Self::contact(m, other, target));
            if !alternative {
                return false;
            }
        }
        true
    }

    /// Whether `q` touches `other`: membership counts while embeddings are
    /// still overlapped, target-adjacency is what a proper embedding needs.
    fn contact(q: u32, other: &Chain, target: &Graph) -> bool {
        other.contains(q) || target.neighbors(q).iter().any(|&p| other.contains(p))
    }

    /// Installs a caller-supplied member set as `chain(v)` by growing a BFS
    /// spanning tree from the first member.
    ///
    /// Returns whether every distinct member was reachable from the first;
    /// unreachable members are left out (the chain becomes the connected
    /// component of the first member).
    pub fn adopt(&mut self, v: u32, members: &[u32], target: &mut TargetState) -> bool {
        if members.is_empty() {
            return true;
        }
        let member_set: FxHashSet<u32> = members.iter().copied().collect();
        let root = members[0];
        self.tear(v, target);

        let chain = &mut self.chains[v as usize];
        chain.insert(root, root);
        target.uses[root as usize] += 1;
        let mut frontier = vec![root];
        while let Some(q) = frontier.pop() {
            for &p in target.graph.neighbors(q) {
                if member_set.contains(&p) && !chain.contains(p) {
                    chain.insert(p, q);
                    target.uses[p as usize] += 1;
                    frontier.push(p);
                }
            }
        }
        chain.len() == member_set.len()
    }

    /// Marks `chain(v)` immutable (fixed chain or suspension pin).
    pub fn mark_fixed(&mut self, v: u32) {
        self.fixed[v as usize] = true;
    }

    /// Clones the current chains for a best-so-far snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Chain> {
        self.chains.clone()
    }

    /// Replaces the working chains with a snapshot and rebuilds the target
    /// use counts to match.
    pub fn restore(&mut self, snapshot: &[Chain], target: &mut TargetState) {
        debug_assert_eq!(snapshot.len(), self.chains.len());
        self.chains = snapshot.to_vec();
        target.uses.fill(0);
        for chain in &self.chains {
            for &t in &chain.order {
                target.uses[t as usize] += 1;
            }
        }
    }
}
