//! Geometry for the current snapshot
//!
//! Each mode has a layout engine: a pure function from a classified
//! [`Snapshot`] to a renderer-agnostic, serializable geometry description.
//!
//! # Engines
//!
//! - [`array`]: cell rows with boundary/mid pointers and range dimming
//! - [`graph`]: nodes on a circle with directed adjacency edges
//! - [`tree`]: shrinking-offset binary tree placement
//! - [`dp`]: 2-D table grid or memo tiles
//! - [`sorting`]: proportional bars with index pointers
//!
//! Engines never fail. A missing or malformed binding only removes the part
//! of the geometry that depended on it.
//!
//! [`compose`] ties classification and layout together and also returns the
//! residual bindings (those not used as evidence) for the generic watch list.

pub mod array;
pub mod dp;
pub mod graph;
pub mod sorting;
pub mod tree;

use crate::classify::{classify, Classification, Mode};
use crate::snapshot::{Event, Snapshot};
use crate::value::Value;
use serde::Serialize;

pub use array::ArrayGeometry;
pub use dp::DpGeometry;
pub use graph::GraphGeometry;
pub use sorting::SortingGeometry;
pub use tree::TreeGeometry;

/// A coordinate in layout space (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Mode-tagged geometry for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Geometry {
    Array(ArrayGeometry),
    Graph(GraphGeometry),
    Tree(TreeGeometry),
    Dp(DpGeometry),
    Sorting(SortingGeometry),
    Generic,
}

impl Geometry {
    pub fn mode(&self) -> Mode {
        match self {
            Geometry::Array(_) => Mode::Array,
            Geometry::Graph(_) => Mode::Graph,
            Geometry::Tree(_) => Mode::Tree,
            Geometry::Dp(_) => Mode::Dp,
            Geometry::Sorting(_) => Mode::Sorting,
            Geometry::Generic => Mode::Generic,
        }
    }
}

/// Run the layout engine matching a classification
pub fn layout(classification: &Classification, snapshot: &Snapshot) -> Geometry {
    match classification.mode {
        Mode::Array => Geometry::Array(array::layout_array(classification, snapshot)),
        Mode::Graph => Geometry::Graph(graph::layout_graph(classification, snapshot)),
        Mode::Tree => Geometry::Tree(tree::layout_tree(classification, snapshot)),
        Mode::Dp => Geometry::Dp(dp::layout_dp(classification, snapshot)),
        Mode::Sorting => Geometry::Sorting(sorting::layout_sorting(classification, snapshot)),
        Mode::Generic => Geometry::Generic,
    }
}

/// A binding shown in the generic watch list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchEntry {
    pub name: String,
    pub value: Value,
}

/// Everything the presentation layer needs for the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub position: u32,
    pub event: Event,
    pub function_name: Option<String>,
    pub classification: Classification,
    pub geometry: Geometry,
    /// Bindings not consumed by the specialized layout, in recorded order
    pub residual: Vec<WatchEntry>,
    pub error: Option<String>,
}

/// Bindings that were not evidence for the chosen mode
pub fn residual_bindings(classification: &Classification, snapshot: &Snapshot) -> Vec<WatchEntry> {
    snapshot
        .normalized_bindings()
        .filter(|(name, _)| !classification.is_evidence(name))
        .map(|(name, value)| WatchEntry {
            name: name.to_string(),
            value,
        })
        .collect()
}

/// Classify a snapshot, lay it out and collect the residual bindings
pub fn compose(snapshot: &Snapshot) -> Scene {
    let classification = classify(snapshot);
    let geometry = layout(&classification, snapshot);
    let residual = residual_bindings(&classification, snapshot);
    Scene {
        position: snapshot.position,
        event: snapshot.event,
        function_name: snapshot.function_name.clone(),
        classification,
        geometry,
        residual,
        error: snapshot.error.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evidence_is_not_repeated_in_watch_list() {
        let snap = Snapshot::new(4, Event::Line)
            .with_binding("arr", json!([1, 3, 5]))
            .with_binding("left", json!(0))
            .with_binding("right", json!(2))
            .with_binding("count", json!(9));
        let scene = compose(&snap);
        assert_eq!(scene.geometry.mode(), Mode::Array);
        let names: Vec<&str> = scene.residual.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["count"]);
    }

    #[test]
    fn generic_keeps_every_binding() {
        let snap = Snapshot::new(1, Event::Return)
            .with_binding("x", json!(1))
            .with_binding("__return__", json!("None"));
        let scene = compose(&snap);
        assert_eq!(scene.geometry, Geometry::Generic);
        assert_eq!(scene.residual.len(), 2);
    }

    #[test]
    fn geometry_serializes_with_mode_tag() {
        let snap = Snapshot::new(1, Event::Line).with_binding("dp", json!([[0, 1]]));
        let scene = compose(&snap);
        let encoded = serde_json::to_value(&scene.geometry).unwrap();
        assert_eq!(encoded["mode"], "dp");
        assert_eq!(encoded["kind"], "table");
    }
}
