//! # Tutorial: Steering an Embedding with Constraints
//!
//! This example shows the three ways to constrain where chains land:
//!
//! 1. **fixed_chains** - a chain is given verbatim and never moves
//! 2. **restrict_chains** - a chain should stay inside a region
//! 3. **suspend_chains** - a chain must touch at least one node of a blob
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example tutorial_constraints
//! ```

use weaver_core::{find_embedding, EmbeddingOptions};

fn main() {
    // Source: the path 0 - 1 - 2.
    let source = [(0, 1), (1, 2)];

    // Target: the path 10 - 11 - 12 - 13 - 14.
    let target = [(10, 11), (11, 12), (12, 13), (13, 14)];

    let mut options = EmbeddingOptions {
        random_seed: Some(7),
        ..Default::default()
    };
    // Nail the endpoints to the ends of the target path; the middle vertex
    // must bridge everything in between.
    options.fixed_chains.insert(0, vec![10]);
    options.fixed_chains.insert(2, vec![14]);
    // Keep the bridge off the endpoints' nodes...
    options.restrict_chains.insert(1, vec![11, 12, 13]);
    // ...and insist that it touches node 12.
    options.suspend_chains.insert(1, vec![vec![12]]);

    let embedding = find_embedding(source, target, &options).expect("options are valid");

    println!("proper embedding: {}", embedding.valid);
    for v in 0..3 {
        println!("  chain({v}) = {:?}", embedding.chains[&v]);
    }
    println!(
        "the fixed endpoints stayed put: {:?} and {:?}",
        embedding.chains[&0], embedding.chains[&2]
    );
}
