//! Property-based tests over randomized inputs:
//! - returned chains are always connected, valid or not
//! - a set success flag implies disjointness and full edge coverage
//! - the pairing heap agrees with a reference model under random updates

mod common;

use proptest::prelude::*;

use common::{grid_graph, verify_embedding};
use weaver_core::{find_embedding, EmbeddingOptions, FastResetQueue};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Whatever the trajectory does, every returned chain is connected in
    /// the target graph, and a success flag certifies disjointness plus
    /// edge coverage.
    #[test]
    fn prop_embedding_invariants(
        raw_edges in prop::collection::vec((0i32..5, 0i32..5), 0..9),
        seed in any::<u64>(),
    ) {
        let source: Vec<(i32, i32)> = raw_edges
            .into_iter()
            .filter(|(u, v)| u != v)
            .collect();
        let target = grid_graph(4, 4);
        let options = EmbeddingOptions {
            random_seed: Some(seed),
            tries: 3,
            ..Default::default()
        };
        let embedding = find_embedding(source.clone(), target.clone(), &options).unwrap();
        verify_embedding(&source, &target, &embedding);

        // Every mapped source actually occurs in the source graph.
        for v in embedding.chains.keys() {
            prop_assert!(
                source.iter().any(|&(a, b)| a == *v || b == *v),
                "phantom source {v} in mapping"
            );
        }
    }

    /// Fixed chains come back verbatim whenever the mapping is nonempty.
    #[test]
    fn prop_fixed_chain_verbatim(seed in any::<u64>()) {
        let source = vec![(0, 1), (1, 2), (0, 2)];
        let target = grid_graph(3, 3);
        let mut options = EmbeddingOptions {
            random_seed: Some(seed),
            tries: 3,
            ..Default::default()
        };
        options.fixed_chains.insert(1, vec![4, 5]);
        let embedding = find_embedding(source.clone(), target.clone(), &options).unwrap();
        verify_embedding(&source, &target, &embedding);
        if !embedding.chains.is_empty() {
            prop_assert_eq!(&embedding.chains[&1], &vec![4, 5]);
        }
    }

    /// The pairing heap drains in sorted (value, key) order after a random
    /// mix of inserts and decrease attempts.
    #[test]
    fn prop_heap_matches_model(
        ops in prop::collection::vec((0u32..24, 0u64..1000), 1..64),
    ) {
        let mut heap: FastResetQueue<u64> = FastResetQueue::new(24);
        let mut model: Vec<Option<u64>> = vec![None; 24];
        for &(k, v) in &ops {
            heap.check_decrease_value(k, v);
            let slot = &mut model[k as usize];
            *slot = Some(slot.map_or(v, |old| old.min(v)));
        }

        let mut expected: Vec<(u64, u32)> = model
            .iter()
            .enumerate()
            .filter_map(|(k, v)| v.map(|v| (v, k as u32)))
            .collect();
        expected.sort_unstable();

        let mut drained = Vec::new();
        while let Some((k, v)) = heap.pop_min() {
            drained.push((v, k));
        }
        prop_assert_eq!(drained, expected);
    }
}
