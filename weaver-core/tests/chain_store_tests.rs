//! Chain-store behavior across multiple chains: overlap accounting,
//! snapshot/restore, and pruning against neighbor chains.

use weaver_core::{Chain, ChainStore, Graph, TargetState};

fn grid_3x3() -> Graph {
    // 0 1 2
    // 3 4 5
    // 6 7 8
    let mut edges = Vec::new();
    for y in 0..3u32 {
        for x in 0..3u32 {
            let id = y * 3 + x;
            if x < 2 {
                edges.push((id, id + 1));
            }
            if y < 2 {
                edges.push((id, id + 3));
            }
        }
    }
    Graph::from_edges(9, &edges)
}

#[test]
fn test_overlapping_chains_stack_use_counts() {
    let mut target = TargetState::new(grid_3x3(), 3, u32::MAX);
    let mut store = ChainStore::new(3);
    store.install(0, 4, &[vec![4, 1]], &mut target);
    store.install(1, 4, &[vec![4, 7]], &mut target);
    store.install(2, 4, &[vec![4]], &mut target);
    assert_eq!(target.uses[4], 3);
    assert_eq!(target.max_overlap(), 3);

    store.tear(1, &mut target);
    assert_eq!(target.uses[4], 2);
    assert_eq!(target.uses[7], 0);
}

#[test]
fn test_restore_rebuilds_use_counts() {
    let mut target = TargetState::new(grid_3x3(), 2, u32::MAX);
    let mut store = ChainStore::new(2);
    store.install(0, 0, &[vec![0, 1]], &mut target);
    store.install(1, 8, &[vec![8, 7]], &mut target);
    let snapshot: Vec<Chain> = store.snapshot();

    store.tear(0, &mut target);
    store.install(1, 4, &[vec![4]], &mut target);
    assert_eq!(target.uses[8], 0);

    store.restore(&snapshot, &mut target);
    assert_eq!(target.uses[0], 1);
    assert_eq!(target.uses[1], 1);
    assert_eq!(target.uses[7], 1);
    assert_eq!(target.uses[8], 1);
    assert_eq!(target.uses[4], 0);
    let members: Vec<u32> = store.chain(1).iter().collect();
    assert_eq!(members, vec![8, 7]);
}

#[test]
fn test_prune_keeps_contact_through_kept_leaf() {
    // Source: 0 adjacent to 1 and 2. Chains for 1 and 2 sit at opposite
    // grid corners; chain 0 crosses the middle and may only lose nodes that
    // serve neither neighbor.
    let source = Graph::from_edges(3, &[(0, 1), (0, 2)]);
    let mut target = TargetState::new(grid_3x3(), 3, u32::MAX);
    let mut store = ChainStore::new(3);
    store.install(1, 0, &[vec![0]], &mut target);
    store.install(2, 8, &[vec![8]], &mut target);
    // Chain 0: rooted at 4, an arm through 1 overshooting to 2, and an arm
    // to 7. Node 2 serves neither neighbor; 1 and 7 each carry a contact.
    store.install(0, 4, &[vec![4, 1, 2], vec![4, 7]], &mut target);

    store.prune(0, &source, &mut target);

    let mut members: Vec<u32> = store.chain(0).iter().collect();
    members.sort_unstable();
    assert_eq!(members, vec![1, 4, 7], "only the overshoot may be pruned");
    assert!(store.chain(0).is_connected(&target.graph));
    assert_eq!(target.uses[2], 0);
}

#[test]
fn test_install_replaces_previous_chain() {
    let mut target = TargetState::new(grid_3x3(), 1, u32::MAX);
    let mut store = ChainStore::new(1);
    store.install(0, 0, &[vec![0, 1, 2]], &mut target);
    store.install(0, 6, &[vec![6, 7]], &mut target);
    assert_eq!(target.uses[0..3], [0, 0, 0]);
    assert_eq!(target.uses[6], 1);
    assert_eq!(target.uses[7], 1);
    assert_eq!(store.chain(0).anchor(), Some(6));
}
