//! Visualization mode classification
//!
//! [`classify`] inspects the bindings of one snapshot and picks exactly one
//! [`Mode`]. Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. **tree**: `root` is a mapping with a value-like field or child fields
//! 2. **dp**: `dp` is a 2-D table, or `memo` is a mapping
//! 3. **sorting**: the function name has a sort keyword and `arr` is flat
//! 4. **graph**: `graph` is an adjacency mapping, or the function name has
//!    a traversal keyword
//! 5. **array**: a candidate sequence plus a boundary pointer
//! 6. **generic**: always matches
//!
//! Structurally unambiguous shapes come first so a DP table that happens to
//! sit next to an `arr` auxiliary list is never drawn as an array scan.
//!
//! Each rule returns the binding names it consumed ("evidence"). Evidence is
//! suppressed from the generic watch list so no binding is shown twice.

use crate::snapshot::Snapshot;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Sequence names the array engine draws as cell rows
pub const ARRAY_CANDIDATES: [&str; 5] = ["arr", "weights", "prefix", "suffix", "psum"];
/// Names of the lower boundary pointer, in lookup order
pub const LEFT_POINTERS: [&str; 3] = ["left", "low", "L"];
/// Names of the upper boundary pointer, in lookup order
pub const RIGHT_POINTERS: [&str; 3] = ["right", "high", "R"];
/// Names of the current graph node, in lookup order
pub const CURRENT_NODE: [&str; 3] = ["node", "start", "curr"];
/// Fields holding a tree node's payload, in lookup order
pub const TREE_VALUE_FIELDS: [&str; 4] = ["val", "value", "data", "key"];
/// Column index names for a 2-D DP table, in lookup order
pub const DP_COLUMN_POINTERS: [&str; 2] = ["w", "j"];

const SORT_KEYWORDS: [&str; 3] = ["sort", "partition", "heapify"];
const TRAVERSAL_KEYWORDS: [&str; 5] = ["dfs", "bfs", "traverse", "topo", "dijkstra"];

/// Visualization category for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Array,
    Graph,
    Tree,
    Dp,
    Sorting,
    Generic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Array => "array",
            Mode::Graph => "graph",
            Mode::Tree => "tree",
            Mode::Dp => "dp",
            Mode::Sorting => "sorting",
            Mode::Generic => "generic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen mode and the bindings that justified it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub mode: Mode,
    pub evidence: BTreeSet<String>,
}

impl Classification {
    pub fn generic() -> Self {
        Classification {
            mode: Mode::Generic,
            evidence: BTreeSet::new(),
        }
    }

    pub fn is_evidence(&self, name: &str) -> bool {
        self.evidence.contains(name)
    }
}

/// A rule returns its evidence when it matches
pub type Rule = fn(&Snapshot) -> Option<BTreeSet<String>>;

/// Rules in precedence order; generic is the implicit fallback
pub const RULES: [(Mode, Rule); 5] = [
    (Mode::Tree, tree_rule),
    (Mode::Dp, dp_rule),
    (Mode::Sorting, sorting_rule),
    (Mode::Graph, graph_rule),
    (Mode::Array, array_rule),
];

/// Decide the visualization mode for a snapshot
pub fn classify(snapshot: &Snapshot) -> Classification {
    for (mode, rule) in RULES {
        if let Some(evidence) = rule(snapshot) {
            debug!(%mode, ?evidence, position = snapshot.position, "classified snapshot");
            return Classification { mode, evidence };
        }
    }
    Classification::generic()
}

fn evidence_of<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    names.into_iter().map(str::to_string).collect()
}

/// Names from `names` that are bound in the snapshot
fn present<'a>(snapshot: &'a Snapshot, names: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    names.iter().copied().filter(|n| snapshot.has_binding(n))
}

/// Whether a mapping looks like a binary tree node
pub fn is_tree_node(value: &Value) -> bool {
    value.as_mapping().is_some_and(|map| {
        TREE_VALUE_FIELDS.iter().any(|f| map.contains_key(*f))
            || map.contains_key("left")
            || map.contains_key("right")
    })
}

/// Whether a value is a 2-D table: a non-empty sequence of sequences
pub fn is_table(value: &Value) -> bool {
    value
        .as_sequence()
        .is_some_and(|rows| !rows.is_empty() && rows.iter().all(|r| r.as_sequence().is_some()))
}

/// Whether a value is an adjacency list: a non-empty mapping of sequences
pub fn is_adjacency(value: &Value) -> bool {
    value
        .as_mapping()
        .is_some_and(|map| !map.is_empty() && map.values().all(|v| v.as_sequence().is_some()))
}

pub(crate) fn tree_rule(snapshot: &Snapshot) -> Option<BTreeSet<String>> {
    let root = snapshot.binding("root")?;
    is_tree_node(&root).then(|| evidence_of(["root"]))
}

pub(crate) fn dp_rule(snapshot: &Snapshot) -> Option<BTreeSet<String>> {
    if snapshot.binding("dp").is_some_and(|dp| is_table(&dp)) {
        let mut evidence = evidence_of(["dp"]);
        if snapshot.int_binding("i").is_some() {
            evidence.insert("i".to_string());
        }
        if let Some((column, _)) = snapshot.first_int_binding(&DP_COLUMN_POINTERS) {
            evidence.insert(column.to_string());
        }
        return Some(evidence);
    }

    if snapshot.binding("memo").is_some_and(|m| m.as_mapping().is_some()) {
        let mut evidence = evidence_of(["memo"]);
        if snapshot.binding("n").is_some_and(|n| n.as_text().is_some()) {
            evidence.insert("n".to_string());
        }
        return Some(evidence);
    }

    None
}

pub(crate) fn sorting_rule(snapshot: &Snapshot) -> Option<BTreeSet<String>> {
    if !snapshot.function_matches(&SORT_KEYWORDS) {
        return None;
    }
    let arr = snapshot.binding("arr").filter(Value::is_flat_sequence)?;
    let len = arr.as_sequence().map_or(0, <[Value]>::len);

    let mut evidence = evidence_of(["arr"]);
    evidence.extend(
        snapshot
            .index_pointers("arr", len)
            .into_iter()
            .map(|(name, _)| name),
    );
    Some(evidence)
}

pub(crate) fn graph_rule(snapshot: &Snapshot) -> Option<BTreeSet<String>> {
    let has_graph = snapshot.binding("graph").is_some_and(|g| is_adjacency(&g));
    if !has_graph && !snapshot.function_matches(&TRAVERSAL_KEYWORDS) {
        return None;
    }

    let mut evidence = BTreeSet::new();
    if has_graph {
        evidence.insert("graph".to_string());
    }
    if snapshot.has_binding("visited") {
        evidence.insert("visited".to_string());
    }
    if let Some(current) = present(snapshot, &CURRENT_NODE).next() {
        evidence.insert(current.to_string());
    }
    Some(evidence)
}

pub(crate) fn array_rule(snapshot: &Snapshot) -> Option<BTreeSet<String>> {
    let rows: Vec<&str> = ARRAY_CANDIDATES
        .iter()
        .copied()
        .filter(|name| snapshot.binding(name).is_some_and(|v| v.is_flat_sequence()))
        .collect();
    if rows.is_empty() {
        return None;
    }

    let left = snapshot.first_int_binding(&LEFT_POINTERS);
    let right = snapshot.first_int_binding(&RIGHT_POINTERS);
    if left.is_none() && right.is_none() {
        return None;
    }

    let mut evidence = evidence_of(rows);
    evidence.extend(left.into_iter().chain(right).map(|(name, _)| name.to_string()));
    for name in ["mid", "target"] {
        if snapshot.has_binding(name) {
            evidence.insert(name.to_string());
        }
    }
    if evidence.contains("weights") && snapshot.has_binding("days") {
        evidence.insert("days".to_string());
    }
    Some(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Event;
    use serde_json::json;

    fn snap() -> Snapshot {
        Snapshot::new(1, Event::Line)
    }

    #[test]
    fn tree_wins_over_array() {
        let s = snap()
            .with_binding("root", json!({"val": 1, "left": {"val": 0}, "right": null}))
            .with_binding("arr", json!([1, 2, 3]))
            .with_binding("left", json!(0))
            .with_binding("right", json!(2));
        let c = classify(&s);
        assert_eq!(c.mode, Mode::Tree);
        assert_eq!(c.evidence, evidence_of(["root"]));
    }

    #[test]
    fn dp_table_wins_over_auxiliary_arr() {
        let s = snap()
            .with_binding("dp", json!([[0, 0], [0, 5]]))
            .with_binding("arr", json!([1, 2]))
            .with_binding("left", json!(0))
            .with_binding("i", json!(1))
            .with_binding("w", json!(1));
        let c = classify(&s);
        assert_eq!(c.mode, Mode::Dp);
        assert_eq!(c.evidence, evidence_of(["dp", "i", "w"]));
    }

    #[test]
    fn memo_mapping_is_dp() {
        let s = snap()
            .with_binding("memo", json!({"1": 1, "2": 1}))
            .with_binding("n", json!(3));
        let c = classify(&s);
        assert_eq!(c.mode, Mode::Dp);
        assert_eq!(c.evidence, evidence_of(["memo", "n"]));
    }

    #[test]
    fn empty_dp_is_not_a_table() {
        let s = snap().with_binding("dp", json!([]));
        assert_eq!(classify(&s).mode, Mode::Generic);
    }

    #[test]
    fn sorting_needs_function_keyword() {
        let base = snap()
            .with_binding("arr", json!([3, 1, 2]))
            .with_binding("i", json!(0))
            .with_binding("j", json!(7));
        assert_eq!(classify(&base).mode, Mode::Generic);

        let c = classify(&base.with_function("bubble_sort"));
        assert_eq!(c.mode, Mode::Sorting);
        // j is out of bounds, so it is not a pointer
        assert_eq!(c.evidence, evidence_of(["arr", "i"]));
    }

    #[test]
    fn graph_by_shape_or_name() {
        let by_shape = snap()
            .with_binding("graph", json!({"A": ["B"], "B": []}))
            .with_binding("visited", json!("{'A'}"))
            .with_binding("node", json!("A"));
        let c = classify(&by_shape);
        assert_eq!(c.mode, Mode::Graph);
        assert_eq!(c.evidence, evidence_of(["graph", "visited", "node"]));

        let by_name = snap().with_function("bfs").with_binding("start", json!("A"));
        let c = classify(&by_name);
        assert_eq!(c.mode, Mode::Graph);
        assert_eq!(c.evidence, evidence_of(["start"]));
    }

    #[test]
    fn array_requires_boundary_pointer() {
        let s = snap()
            .with_binding("arr", json!([1, 3, 5]))
            .with_binding("target", json!(5));
        assert_eq!(classify(&s).mode, Mode::Generic);

        let c = classify(&s.with_binding("high", json!(2)).with_binding("mid", json!(1)));
        assert_eq!(c.mode, Mode::Array);
        assert_eq!(c.evidence, evidence_of(["arr", "high", "mid", "target"]));
    }

    #[test]
    fn answer_search_consumes_days() {
        let s = snap()
            .with_binding("weights", json!([1, 2, 3]))
            .with_binding("days", json!(2))
            .with_binding("left", json!(3))
            .with_binding("right", json!(6));
        let c = classify(&s);
        assert_eq!(c.mode, Mode::Array);
        assert!(c.is_evidence("days"));
    }

    #[test]
    fn nothing_matches_generic() {
        let s = snap().with_binding("x", json!(1));
        assert_eq!(classify(&s), Classification::generic());
    }
}
