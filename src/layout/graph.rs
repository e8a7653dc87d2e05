//! Circular graph layout
//!
//! Node names are sorted lexicographically and spaced evenly on a circle,
//! starting at the top and going clockwise. Every adjacency entry becomes a
//! directed edge; an undirected graph therefore yields two edges per pair,
//! which render identically.

use super::Point;
use crate::classify::{Classification, CURRENT_NODE};
use crate::snapshot::Snapshot;
use crate::value::{Scalar, Value};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, TAU};

pub const CENTER: Point = Point::new(200.0, 200.0);
pub const RADIUS: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Current,
    Visited,
    Unvisited,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub position: Point,
    pub state: NodeState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GraphGeometry {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphGeometry {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Position of node `index` out of `count` on the layout circle
pub fn circle_position(index: usize, count: usize) -> Point {
    let angle = TAU * index as f64 / count.max(1) as f64 - FRAC_PI_2;
    Point::new(
        CENTER.x + RADIUS * angle.cos(),
        CENTER.y + RADIUS * angle.sin(),
    )
}

pub fn layout_graph(_classification: &Classification, snapshot: &Snapshot) -> GraphGeometry {
    let Some(Value::Mapping(adjacency)) = snapshot.binding("graph") else {
        return GraphGeometry::default();
    };

    let neighbors_of = |node: &str| -> Vec<String> {
        adjacency
            .get(node)
            .and_then(Value::as_sequence)
            .map(|items| items.iter().map(Value::label).collect())
            .unwrap_or_default()
    };

    // Neighbors that never appear as keys still get a node
    let names: BTreeSet<String> = adjacency
        .keys()
        .cloned()
        .chain(adjacency.keys().flat_map(|k| neighbors_of(k.as_str())))
        .collect();
    let names: Vec<String> = names.into_iter().collect();

    let visited = snapshot
        .binding("visited")
        .map(|v| parse_visited(&v))
        .unwrap_or_default();
    let current = CURRENT_NODE
        .iter()
        .find_map(|name| snapshot.binding(name))
        .and_then(|v| v.as_text());

    let position_of = |name: &str| -> Point {
        let index = names.binary_search_by(|n| n.as_str().cmp(name)).unwrap_or(0);
        circle_position(index, names.len())
    };

    let nodes = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let state = if current.as_deref() == Some(name.as_str()) {
                NodeState::Current
            } else if visited.contains(name) {
                NodeState::Visited
            } else {
                NodeState::Unvisited
            };
            GraphNode {
                name: name.clone(),
                position: circle_position(index, names.len()),
                state,
            }
        })
        .collect();

    let edges = names
        .iter()
        .flat_map(|from| {
            neighbors_of(from.as_str())
                .into_iter()
                .map(move |to| (from, to))
        })
        .map(|(from, to)| GraphEdge {
            start: position_of(from.as_str()),
            end: position_of(to.as_str()),
            from: from.clone(),
            to,
        })
        .collect();

    GraphGeometry { nodes, edges }
}

/// Names recorded in a `visited` binding.
///
/// Lists and mappings (keys) are read directly. Text forms such as a Python
/// set repr (`{'A', 'B'}`, `set()`) are split on commas with quotes stripped.
pub fn parse_visited(value: &Value) -> FxHashSet<String> {
    match value {
        Value::Sequence(items) => items.iter().map(Value::label).collect(),
        Value::Mapping(map) => map.keys().cloned().collect(),
        Value::Unknown(text) | Value::Scalar(Scalar::Str(text)) => parse_set_text(text),
        Value::Scalar(_) => FxHashSet::default(),
    }
}

fn parse_set_text(text: &str) -> FxHashSet<String> {
    let mut body = text.trim();
    if let Some(inner) = body
        .strip_prefix("set(")
        .or_else(|| body.strip_prefix("frozenset("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        body = inner.trim();
    }
    let body = body
        .trim_start_matches(['{', '[', '('])
        .trim_end_matches(['}', ']', ')']);

    body.split(',')
        .map(|item| item.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
