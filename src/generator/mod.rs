//! Synthetic test inputs
//!
//! Generators produce well-formed array and graph inputs together with a
//! driver call, as plain Python source text meant to be appended to the
//! program under inspection. They know nothing about where the text ends up.
//!
//! All generators take any [`rand::Rng`], so callers can pass `rand::rng()`
//! interactively and a seeded `StdRng` in tests.

mod array;
mod graph;

pub use array::{generate_array, ArrayKind, GeneratedArray, MAX_ARRAY_SIZE, MIN_ARRAY_SIZE};
pub use graph::{
    generate_graph, node_name, GeneratedGraph, TraversalFamily, MAX_GRAPH_NODES, MIN_GRAPH_NODES,
};
