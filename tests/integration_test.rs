// End-to-end tests: backend response -> snapshots -> playback -> scene

use tracetty::backend::decode_response;
use tracetty::classify::Mode;
use tracetty::layout::dp::DpGeometry;
use tracetty::layout::graph::NodeState;
use tracetty::layout::{compose, Geometry};
use tracetty::playback::PlaybackController;
use tracetty::snapshot::Event;

const BINARY_SEARCH_RESPONSE: &str = r#"{"results": [{"input": "", "trace": [
    {"line": 1, "locals": {}, "event": "line", "func_name": "<module>"},
    {"line": 12, "locals": {"binary_search": "<function binary_search at 0x7f>"}, "event": "line", "func_name": "<module>"},
    {"line": 1, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7}, "event": "call", "func_name": "binary_search"},
    {"line": 2, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7, "left": 0, "right": 4}, "event": "line", "func_name": "binary_search"},
    {"line": 4, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7, "left": 0, "right": 4, "mid": 2}, "event": "line", "func_name": "binary_search"},
    {"line": 7, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7, "left": 3, "right": 4, "mid": 2}, "event": "line", "func_name": "binary_search"},
    {"line": 4, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7, "left": 3, "right": 4, "mid": 3}, "event": "line", "func_name": "binary_search"},
    {"line": 5, "locals": {"arr": [1, 3, 5, 7, 9], "target": 7, "left": 3, "right": 4, "mid": 3, "__return__": "3"}, "event": "return", "func_name": "binary_search"},
    {"line": 13, "locals": {"binary_search": "<function binary_search at 0x7f>", "result": 3}, "event": "line", "func_name": "<module>"}
]}]}"#;

#[test]
fn binary_search_replay() {
    let steps = decode_response(BINARY_SEARCH_RESPONSE).expect("decode failed");
    let mut controller = PlaybackController::default();
    controller.load(steps);
    assert_eq!(controller.len(), 9);

    // Module prologue has nothing to specialize on
    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.classification.mode, Mode::Generic);

    controller.seek(6);
    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.classification.mode, Mode::Array);
    let Geometry::Array(geo) = &scene.geometry else {
        panic!("expected array geometry");
    };
    let cells = &geo.rows[0].cells;
    let found: Vec<usize> = cells.iter().filter(|c| c.found).map(|c| c.index).collect();
    assert_eq!(found, [3]);
    assert!(!cells[2].in_range);
    assert_eq!(cells[3].label.as_deref(), Some("L/M"));
    assert_eq!(cells[4].label.as_deref(), Some("R"));
    assert!(scene.residual.is_empty());

    // The return value is never consumed by the array view
    assert!(controller.step_forward());
    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.event, Event::Return);
    let names: Vec<&str> = scene.residual.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["__return__"]);
    assert_eq!(scene.residual[0].value.label(), "3");

    controller.jump_to_end();
    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.classification.mode, Mode::Generic);
    assert_eq!(scene.position, 13);
    assert_eq!(scene.residual.len(), 2);
}

#[test]
fn dfs_replay_marks_frontier() {
    let body = r#"{"results": [{"input": "", "trace": [
        {"line": 1, "locals": {"graph": {"A": ["B", "C"], "B": ["A"], "C": ["A"]}, "node": "A", "visited": "set()"}, "event": "call", "func_name": "dfs"},
        {"line": 3, "locals": {"graph": {"A": ["B", "C"], "B": ["A"], "C": ["A"]}, "node": "A", "visited": "{'A'}"}, "event": "line", "func_name": "dfs"},
        {"line": 1, "locals": {"graph": {"A": ["B", "C"], "B": ["A"], "C": ["A"]}, "node": "B", "visited": "{'A'}"}, "event": "call", "func_name": "dfs"}
    ]}]}"#;
    let mut controller = PlaybackController::default();
    controller.load(decode_response(body).unwrap());

    controller.seek(2);
    let scene = compose(controller.current().unwrap());
    let Geometry::Graph(geo) = &scene.geometry else {
        panic!("expected graph geometry");
    };
    assert_eq!(geo.node("A").unwrap().state, NodeState::Visited);
    assert_eq!(geo.node("B").unwrap().state, NodeState::Current);
    assert_eq!(geo.node("C").unwrap().state, NodeState::Unvisited);
    assert_eq!(geo.edges.len(), 4);

    let evidence: Vec<&str> = scene
        .classification
        .evidence
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(evidence, ["graph", "node", "visited"]);
}

#[test]
fn knapsack_table_replay() {
    let body = r#"[
        {"line": 5, "locals": {"dp": [[0, 0, 0], [0, 0, 0]], "i": 1, "w": 0}, "event": "line", "func_name": "knapsack"},
        {"line": 7, "locals": {"dp": [[0, 0, 0], [0, 4, 4]], "i": 1, "w": 2, "weights": [1], "values": [4]}, "event": "line", "func_name": "knapsack"}
    ]"#;
    let mut controller = PlaybackController::default();
    controller.load(decode_response(body).unwrap());
    controller.jump_to_end();

    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.classification.mode, Mode::Dp);
    let Geometry::Dp(DpGeometry::Table(table)) = &scene.geometry else {
        panic!("expected dp table");
    };
    assert_eq!(table.active, Some((1, 2)));
    assert!(table.cell(1, 2).unwrap().active);
    assert!(table.cell(0, 1).unwrap().dimmed);

    // weights and values are not part of the table view
    let names: Vec<&str> = scene.residual.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["weights", "values"]);
}

#[test]
fn sorting_replay_uses_function_name() {
    let body = r#"[
        {"line": 3, "locals": {"arr": [5, 1, 4], "i": 0, "j": 1}, "event": "line", "func_name": "bubble_sort"},
        {"line": 3, "locals": {"arr": [5, 1, 4], "i": 0, "j": 1}, "event": "line", "func_name": "helper"}
    ]"#;
    let steps = decode_response(body).unwrap();
    let sorting = compose(&steps[0]);
    assert_eq!(sorting.classification.mode, Mode::Sorting);
    let Geometry::Sorting(geo) = &sorting.geometry else {
        panic!("expected bars");
    };
    assert_eq!(geo.bars[0].pointers, ["i"]);
    assert_eq!(geo.bars[1].pointers, ["j"]);

    // Same bindings outside a sort function fall back to generic
    assert_eq!(compose(&steps[1]).classification.mode, Mode::Generic);
}

#[test]
fn tree_replay_with_stringified_children() {
    let body = r#"[
        {"line": 2, "locals": {"root": {"val": 8, "left": "{\"val\": 3}", "right": {"val": 10, "left": null, "right": null}}}, "event": "line", "func_name": "inorder"}
    ]"#;
    let steps = decode_response(body).unwrap();
    let scene = compose(&steps[0]);
    let Geometry::Tree(geo) = &scene.geometry else {
        panic!("expected tree");
    };
    let labels: Vec<&str> = geo.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, ["8", "3", "10"]);
    assert_eq!(geo.edges.len(), 2);
}

#[test]
fn failed_run_ends_with_exception_step() {
    let body = r#"{"results": [{"input": "", "trace": [
        {"line": 1, "locals": {}, "event": "line", "func_name": "<module>"},
        {"line": 2, "locals": {"x": 0}, "event": "line", "func_name": "<module>"},
        {"event": "error", "error": "division by zero", "traceback": "Traceback (most recent call last):\nZeroDivisionError: division by zero"}
    ]}]}"#;
    let mut controller = PlaybackController::default();
    controller.load(decode_response(body).unwrap());
    controller.jump_to_end();

    let scene = compose(controller.current().unwrap());
    assert_eq!(scene.event, Event::Exception);
    assert_eq!(scene.position, 2);
    assert!(scene.residual.is_empty());
    let error = scene.error.unwrap();
    assert!(error.starts_with("division by zero\n"));
    assert!(error.ends_with("ZeroDivisionError: division by zero"));
}

#[test]
fn scene_serializes_with_mode_tag() {
    let steps = decode_response(BINARY_SEARCH_RESPONSE).unwrap();
    let scene = compose(&steps[4]);
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["geometry"]["mode"], "array");
    assert_eq!(json["classification"]["mode"], "array");
    assert_eq!(json["event"], "line");
}

#[test]
fn empty_results_are_rejected() {
    let err = decode_response(r#"{"results": [{"input": "", "trace": []}]}"#).unwrap_err();
    assert!(matches!(err, tracetty::error::BackendError::EmptyTrace));
    assert!(decode_response("[]").is_err());
}

#[test]
fn string_bindings_drive_node_and_target() {
    let body = r#"[
        {"line": 3, "locals": {"graph": {"A": ["B"], "B": ["A"]}, "visited": ["A"], "node": "B"}, "event": "call", "func_name": "dfs"},
        {"line": 4, "locals": {"arr": ["a", "b", "c"], "left": 0, "right": 2, "mid": 1, "target": "b"}, "event": "line", "func_name": "binary_search"}
    ]"#;
    let steps = decode_response(body).unwrap();

    let Geometry::Graph(graph) = compose(&steps[0]).geometry else {
        panic!("expected graph geometry");
    };
    assert_eq!(graph.node("A").unwrap().state, NodeState::Visited);
    assert_eq!(graph.node("B").unwrap().state, NodeState::Current);

    let Geometry::Array(array) = compose(&steps[1]).geometry else {
        panic!("expected array geometry");
    };
    let found: Vec<usize> = array.rows[0]
        .cells
        .iter()
        .filter(|c| c.found)
        .map(|c| c.index)
        .collect();
    assert_eq!(found, [1]);
}
