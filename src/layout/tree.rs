//! Binary tree layout
//!
//! Classic shrinking-offset placement: the root sits at a fixed top
//! coordinate and a child at depth `d` is shifted horizontally by
//! `BASE_OFFSET / 2^d` from its parent and down by one level. A subtree below
//! depth `d` spans less than `BASE_OFFSET / 2^d` on either side, so left and
//! right subtrees can never overlap, and no balancing pass is needed.

use super::Point;
use crate::classify::{Classification, TREE_VALUE_FIELDS};
use crate::snapshot::Snapshot;
use crate::value::Value;
use serde::Serialize;

pub const ROOT_POSITION: Point = Point::new(400.0, 40.0);
pub const BASE_OFFSET: f64 = 200.0;
pub const LEVEL_HEIGHT: f64 = 70.0;
/// Nodes deeper than this are not placed
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// Pre-order index
    pub id: usize,
    pub label: String,
    pub position: Point,
    pub depth: usize,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEdge {
    pub parent: usize,
    pub child: usize,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TreeGeometry {
    pub nodes: Vec<TreeNode>,
    pub edges: Vec<TreeEdge>,
}

/// Horizontal distance between a node at `depth` and its parent
pub fn child_offset(depth: usize) -> f64 {
    BASE_OFFSET / 2f64.powi(depth as i32)
}

pub fn layout_tree(_classification: &Classification, snapshot: &Snapshot) -> TreeGeometry {
    let mut geometry = TreeGeometry::default();
    if let Some(root) = snapshot.binding("root") {
        place(&root, ROOT_POSITION, 0, None, &mut geometry);
    }
    geometry
}

fn node_label(node: &Value) -> String {
    node.as_mapping()
        .and_then(|map| TREE_VALUE_FIELDS.iter().find_map(|f| map.get(*f)))
        .map(Value::label)
        .unwrap_or_else(|| "?".to_string())
}

fn place(
    node: &Value,
    position: Point,
    depth: usize,
    parent: Option<usize>,
    geometry: &mut TreeGeometry,
) {
    let Some(map) = node.as_mapping() else {
        return;
    };
    if depth > MAX_DEPTH {
        return;
    }

    let id = geometry.nodes.len();
    geometry.nodes.push(TreeNode {
        id,
        label: node_label(node),
        position,
        depth,
        parent,
    });
    if let Some(parent_id) = parent {
        geometry.edges.push(TreeEdge {
            parent: parent_id,
            child: id,
            start: geometry.nodes[parent_id].position,
            end: position,
        });
    }

    let child_depth = depth + 1;
    let dx = child_offset(child_depth);
    let y = position.y + LEVEL_HEIGHT;
    for (field, direction) in [("left", -1.0), ("right", 1.0)] {
        // Children may themselves arrive as text
        if let Some(child) = map.get(field).map(Value::promote) {
            if child.as_mapping().is_some() {
                let child_position = Point::new(position.x + direction * dx, y);
                place(&child, child_position, child_depth, Some(id), geometry);
            }
        }
    }
}
