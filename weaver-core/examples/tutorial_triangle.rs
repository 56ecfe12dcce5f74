//! # Tutorial: Embedding a Triangle into a Grid
//!
//! This example walks through the smallest interesting minor-embedding
//! problem: mapping a triangle (three mutually connected variables) onto a
//! 2x2 grid, which has no triangle of its own.
//!
//! ## What You'll Learn
//!
//! 1. **Chains**: why one source vertex may need several target nodes
//! 2. **Edge coverage**: how a source edge is witnessed by a target edge
//! 3. **Reading the result**: the mapping, the success flag, and the stats
//!
//! ## The Physical Picture
//!
//! Annealer hardware graphs are sparse: a logical variable that needs more
//! neighbors than a physical qubit has must spread over a *chain* of
//! qubits acting as one. The 2x2 grid is the toy version: to close the
//! triangle, one variable has to own two grid nodes.
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example tutorial_triangle
//! ```

use weaver_core::{find_embedding, EmbeddingOptions};

fn main() {
    // Source: the triangle a-b-c.
    let source = [("a", "b"), ("b", "c"), ("a", "c")];

    // Target: the 2x2 grid.
    //
    //   "nw" -- "ne"
    //    |       |
    //   "sw" -- "se"
    let target = [
        ("nw", "ne"),
        ("ne", "se"),
        ("se", "sw"),
        ("sw", "nw"),
    ];

    let options = EmbeddingOptions {
        random_seed: Some(42),
        ..Default::default()
    };

    let embedding = find_embedding(source, target, &options).expect("options are valid");

    println!("proper embedding: {}", embedding.valid);
    let mut sources: Vec<_> = embedding.chains.keys().collect();
    sources.sort();
    for v in sources {
        println!("  chain({v}) = {:?}", embedding.chains[v]);
    }
    println!(
        "longest chain: {} node(s), {} grid nodes used in total",
        embedding.stats.max_chain_length, embedding.stats.total_chain_length
    );
}
