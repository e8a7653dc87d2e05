//! Random connected graphs
//!
//! Nodes are named `A`, `B`, ... and `A` always reaches every other node.
//! The snippet is a single-quoted Python adjacency literal followed by the
//! traversal driver call.

use indexmap::IndexMap;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

pub const MIN_GRAPH_NODES: usize = 1;
pub const MAX_GRAPH_NODES: usize = 20;

/// Which traversal entry point the driver call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalFamily {
    #[default]
    Dfs,
    Bfs,
}

impl TraversalFamily {
    pub fn driver_call(self) -> &'static str {
        match self {
            TraversalFamily::Dfs => "dfs(graph, 'A', set())",
            TraversalFamily::Bfs => "bfs(graph, 'A')",
        }
    }
}

impl fmt::Display for TraversalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalFamily::Dfs => write!(f, "dfs"),
            TraversalFamily::Bfs => write!(f, "bfs"),
        }
    }
}

impl FromStr for TraversalFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" => Ok(TraversalFamily::Dfs),
            "bfs" => Ok(TraversalFamily::Bfs),
            other => Err(format!("unknown traversal '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedGraph {
    /// Adjacency lists keyed by node name, in node order
    pub adjacency: IndexMap<String, Vec<String>>,
    pub directed: bool,
    pub snippet: String,
}

impl GeneratedGraph {
    /// Whether every node is reachable from `start` along adjacency lists
    pub fn is_connected_from(&self, start: &str) -> bool {
        if !self.adjacency.contains_key(start) {
            return false;
        }
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(node) = queue.pop_front() {
            for next in self.adjacency.get(node).into_iter().flatten() {
                if seen.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }
        seen.len() == self.adjacency.len()
    }
}

/// Name of node `index`: `A`, `B`, ... `T`
pub fn node_name(index: usize) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}

/// Generate a random graph of `nodes` nodes (clamped to `[1, 20]`) in which
/// every node is reachable from `A`.
///
/// A random spanning tree is built first, attaching each node to a uniformly
/// chosen node already in the graph. Then `floor(n / 2)` extra edges are
/// attempted; self loops and duplicates are rejected.
pub fn generate_graph<R: Rng + ?Sized>(
    rng: &mut R,
    nodes: usize,
    directed: bool,
    traversal: TraversalFamily,
) -> GeneratedGraph {
    let size = nodes.clamp(MIN_GRAPH_NODES, MAX_GRAPH_NODES);
    let names: Vec<String> = (0..size).map(node_name).collect();
    let mut adjacency: IndexMap<String, Vec<String>> =
        names.iter().map(|n| (n.clone(), Vec::new())).collect();

    for child in 1..size {
        let parent = rng.random_range(0..child);
        link(&mut adjacency, &names[parent], &names[child], directed);
    }

    for _ in 0..size / 2 {
        let u = rng.random_range(0..size);
        let v = rng.random_range(0..size);
        if u == v || adjacency[&names[u]].contains(&names[v]) {
            continue;
        }
        link(&mut adjacency, &names[u], &names[v], directed);
    }

    let snippet = graph_snippet(&adjacency, traversal);
    GeneratedGraph {
        adjacency,
        directed,
        snippet,
    }
}

fn link(adjacency: &mut IndexMap<String, Vec<String>>, from: &str, to: &str, directed: bool) {
    if let Some(list) = adjacency.get_mut(from) {
        list.push(to.to_string());
    }
    if !directed {
        if let Some(list) = adjacency.get_mut(to) {
            if !list.iter().any(|n| n == from) {
                list.push(from.to_string());
            }
        }
    }
}

fn graph_snippet(adjacency: &IndexMap<String, Vec<String>>, traversal: TraversalFamily) -> String {
    let mut literal = String::from("{\n");
    for (node, neighbors) in adjacency {
        let items = neighbors
            .iter()
            .map(|n| format!("'{}'", n))
            .collect::<Vec<_>>()
            .join(", ");
        literal.push_str(&format!("    '{}': [{}],\n", node, items));
    }
    literal.push('}');

    format!(
        "\n# Generated graph (nodes: {})\ngraph = {}\n{}\n",
        adjacency.len(),
        literal,
        traversal.driver_call()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn nodes_are_lettered_in_order() {
        let mut rng = StdRng::seed_from_u64(9);
        let graph = generate_graph(&mut rng, 4, false, TraversalFamily::Dfs);
        let keys: Vec<&str> = graph.adjacency.keys().map(String::as_str).collect();
        assert_eq!(keys, ["A", "B", "C", "D"]);
    }

    #[test]
    fn connected_for_every_seed() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for directed in [false, true] {
                let graph = generate_graph(&mut rng, 12, directed, TraversalFamily::Bfs);
                assert!(graph.is_connected_from("A"), "seed {seed} directed {directed}");
            }
        }
    }

    #[test]
    fn undirected_edges_are_mirrored_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(5);
        let graph = generate_graph(&mut rng, 10, false, TraversalFamily::Dfs);
        for (node, neighbors) in &graph.adjacency {
            let unique: FxHashSet<&String> = neighbors.iter().collect();
            assert_eq!(unique.len(), neighbors.len(), "duplicate neighbor of {node}");
            assert!(!neighbors.contains(node));
            for n in neighbors {
                assert!(graph.adjacency[n].contains(node), "{node}-{n} not mirrored");
            }
        }
    }

    #[test]
    fn edge_count_is_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let graph = generate_graph(&mut rng, 8, true, TraversalFamily::Dfs);
        let edges: usize = graph.adjacency.values().map(Vec::len).sum();
        // spanning tree plus at most floor(n / 2) extra edges
        assert!((7..=7 + 4).contains(&edges));
    }

    #[test]
    fn single_node_graph() {
        let mut rng = StdRng::seed_from_u64(0);
        let graph = generate_graph(&mut rng, 0, false, TraversalFamily::Dfs);
        assert_eq!(graph.adjacency.len(), 1);
        assert!(graph.adjacency["A"].is_empty());
        assert!(graph.is_connected_from("A"));
    }

    #[test]
    fn snippet_uses_single_quoted_literal() {
        let mut rng = StdRng::seed_from_u64(2);
        let graph = generate_graph(&mut rng, 2, true, TraversalFamily::Bfs);
        // B may or may not gain the extra edge back to A
        assert!(graph.snippet.contains("graph = {\n    'A': ['B'],\n    'B': ["));
        assert!(graph.snippet.contains("],\n}\n"));
        assert!(graph.snippet.trim_end().ends_with("bfs(graph, 'A')"));

        let dfs = generate_graph(&mut rng, 2, false, TraversalFamily::Dfs);
        assert!(dfs.snippet.contains("dfs(graph, 'A', set())"));
    }

    #[test]
    fn connectivity_check_detects_unreachable_nodes() {
        let mut adjacency = IndexMap::new();
        adjacency.insert("A".to_string(), vec!["B".to_string()]);
        adjacency.insert("B".to_string(), vec![]);
        adjacency.insert("C".to_string(), vec!["A".to_string()]);
        let graph = GeneratedGraph {
            adjacency,
            directed: true,
            snippet: String::new(),
        };
        assert!(!graph.is_connected_from("A"));
        assert!(graph.is_connected_from("C"));
        assert!(!graph.is_connected_from("Z"));
    }
}
