//! Array / search layout
//!
//! Every candidate sequence present in the snapshot becomes a row of cells.
//! Boundary pointers (`left`/`low`/`L`, `right`/`high`/`R`) and `mid` are
//! annotated per cell; cells outside the active `[left, right]` window are
//! dimmed but still drawn.
//!
//! # Found Rule
//!
//! A cell is "found" when it equals `target` and it is the `mid` cell. Only
//! when no `mid` binding exists does any in-range cell equal to `target`
//! count. Equal values outside the active window are never highlighted.
//!
//! # Binary Search on the Answer
//!
//! When `weights` coexists with a `days` scalar and both boundary pointers,
//! the pointers describe a numeric answer range rather than indices. The
//! range is reported in [`ArrayGeometry::answer_range`] and no per-cell
//! pointer is drawn on the `weights` row.

use super::Point;
use crate::classify::{Classification, ARRAY_CANDIDATES, LEFT_POINTERS, RIGHT_POINTERS};
use crate::snapshot::Snapshot;
use crate::value::Value;
use serde::Serialize;

pub const CELL_WIDTH: f64 = 48.0;
pub const ROW_HEIGHT: f64 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayGeometry {
    pub rows: Vec<ArrayRow>,
    pub answer_range: Option<AnswerRange>,
    /// Display text of the `target` binding, if any
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayRow {
    pub name: String,
    pub cells: Vec<ArrayCell>,
    /// False for the `weights` row in answer-search mode
    pub pointers_drawn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayCell {
    pub index: usize,
    pub value: String,
    pub position: Point,
    pub left: bool,
    pub right: bool,
    pub mid: bool,
    /// Pointer label such as `L`, `R`, `L/R` or `M`
    pub label: Option<String>,
    pub in_range: bool,
    pub found: bool,
}

/// Abstract numeric range searched in answer-search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerRange {
    pub low: i64,
    pub high: i64,
    pub mid: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
struct Pointers {
    left: Option<i64>,
    right: Option<i64>,
    mid: Option<i64>,
}

impl Pointers {
    fn in_range(&self, index: i64) -> bool {
        self.left.map_or(true, |l| index >= l) && self.right.map_or(true, |r| index <= r)
    }

    fn label(&self, index: i64) -> Option<String> {
        let at_left = self.left == Some(index);
        let at_right = self.right == Some(index);
        let mut parts = Vec::new();
        match (at_left, at_right) {
            (true, true) => parts.push("L/R"),
            (true, false) => parts.push("L"),
            (false, true) => parts.push("R"),
            (false, false) => {}
        }
        if self.mid == Some(index) {
            parts.push("M");
        }
        (!parts.is_empty()).then(|| parts.join("/"))
    }
}

pub fn layout_array(_classification: &Classification, snapshot: &Snapshot) -> ArrayGeometry {
    let pointers = Pointers {
        left: snapshot.first_int_binding(&LEFT_POINTERS).map(|(_, v)| v),
        right: snapshot.first_int_binding(&RIGHT_POINTERS).map(|(_, v)| v),
        mid: snapshot.int_binding("mid"),
    };
    let target = snapshot.binding("target").filter(|t| t.as_text().is_some());

    let answer_mode = snapshot.binding("weights").is_some_and(|w| w.is_flat_sequence())
        && snapshot.binding("days").is_some_and(|d| d.as_scalar().is_some())
        && pointers.left.is_some()
        && pointers.right.is_some();

    let answer_range = match (answer_mode, pointers.left, pointers.right) {
        (true, Some(low), Some(high)) => Some(AnswerRange {
            low,
            high,
            mid: pointers.mid,
        }),
        _ => None,
    };

    let rows = ARRAY_CANDIDATES
        .iter()
        .filter_map(|name| {
            let value = snapshot.binding(name).filter(Value::is_flat_sequence)?;
            Some((*name, value))
        })
        .enumerate()
        .map(|(row_index, (name, value))| {
            let draw_pointers = !(answer_mode && name == "weights");
            let items = value.as_sequence().unwrap_or_default();
            let y = row_index as f64 * ROW_HEIGHT;
            let cells = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let position = Point::new(index as f64 * CELL_WIDTH, y);
                    if draw_pointers {
                        build_cell(index, item, position, &pointers, target.as_ref())
                    } else {
                        plain_cell(index, item, position)
                    }
                })
                .collect();
            ArrayRow {
                name: name.to_string(),
                cells,
                pointers_drawn: draw_pointers,
            }
        })
        .collect();

    ArrayGeometry {
        rows,
        answer_range,
        target: target.map(|t| t.label()),
    }
}

fn build_cell(
    index: usize,
    item: &Value,
    position: Point,
    pointers: &Pointers,
    target: Option<&Value>,
) -> ArrayCell {
    let i = index as i64;
    let in_range = pointers.in_range(i);
    let matches_target = target.is_some_and(|t| item.loosely_eq(t));
    let found = matches_target
        && match pointers.mid {
            Some(mid) => mid == i,
            None => in_range,
        };

    ArrayCell {
        index,
        value: item.label(),
        position,
        left: pointers.left == Some(i),
        right: pointers.right == Some(i),
        mid: pointers.mid == Some(i),
        label: pointers.label(i),
        in_range,
        found,
    }
}

fn plain_cell(index: usize, item: &Value, position: Point) -> ArrayCell {
    ArrayCell {
        index,
        value: item.label(),
        position,
        left: false,
        right: false,
        mid: false,
        label: None,
        in_range: true,
        found: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::snapshot::Event;
    use serde_json::json;

    fn run(snapshot: &Snapshot) -> ArrayGeometry {
        layout_array(&classify(snapshot), snapshot)
    }

    #[test]
    fn binary_search_step() {
        let snap = Snapshot::new(5, Event::Line)
            .with_binding("arr", json!([1, 3, 5, 7, 9]))
            .with_binding("left", json!(0))
            .with_binding("right", json!(4))
            .with_binding("mid", json!(2))
            .with_binding("target", json!(5));
        let geo = run(&snap);
        let cells = &geo.rows[0].cells;

        assert!(cells[2].mid && cells[2].found);
        assert_eq!(cells[0].label.as_deref(), Some("L"));
        assert_eq!(cells[4].label.as_deref(), Some("R"));
        assert_eq!(cells[2].label.as_deref(), Some("M"));
        assert!(cells.iter().all(|c| c.in_range));
        assert_eq!(cells.iter().filter(|c| c.found).count(), 1);
        assert_eq!(geo.target.as_deref(), Some("5"));
    }

    #[test]
    fn string_target_is_found_at_mid() {
        let snap = Snapshot::new(5, Event::Line)
            .with_binding("arr", json!(["a", "b", "c"]))
            .with_binding("left", json!(0))
            .with_binding("right", json!(2))
            .with_binding("mid", json!(1))
            .with_binding("target", json!("b"));
        let geo = run(&snap);
        let found: Vec<bool> = geo.rows[0].cells.iter().map(|c| c.found).collect();
        assert_eq!(found, [false, true, false]);
        assert_eq!(geo.target.as_deref(), Some("b"));
    }

    #[test]
    fn collapsed_window_uses_combined_label_and_dims_outside() {
        let snap = Snapshot::new(5, Event::Line)
            .with_binding("arr", json!([1, 3, 5]))
            .with_binding("low", json!(1))
            .with_binding("high", json!(1));
        let geo = run(&snap);
        let cells = &geo.rows[0].cells;
        assert_eq!(cells[1].label.as_deref(), Some("L/R"));
        assert!(!cells[0].in_range && cells[1].in_range && !cells[2].in_range);
    }

    #[test]
    fn equal_value_away_from_mid_is_not_found() {
        let snap = Snapshot::new(5, Event::Line)
            .with_binding("arr", json!([5, 5, 7]))
            .with_binding("left", json!(0))
            .with_binding("right", json!(2))
            .with_binding("mid", json!(2))
            .with_binding("target", json!(5));
        assert!(run(&snap).rows[0].cells.iter().all(|c| !c.found));
    }

    #[test]
    fn without_mid_any_in_range_match_is_found() {
        let snap = Snapshot::new(5, Event::Line)
            .with_binding("arr", json!([5, 2, 5]))
            .with_binding("left", json!(1))
            .with_binding("right", json!(2))
            .with_binding("target", json!(5));
        let found: Vec<usize> = run(&snap).rows[0]
            .cells
            .iter()
            .filter(|c| c.found)
            .map(|c| c.index)
            .collect();
        assert_eq!(found, [2]);
    }

    #[test]
    fn answer_search_leaves_weights_unannotated() {
        let snap = Snapshot::new(9, Event::Line)
            .with_binding("weights", json!([1, 2, 3, 4]))
            .with_binding("days", json!(2))
            .with_binding("left", json!(4))
            .with_binding("right", json!(10))
            .with_binding("mid", json!(7));
        let geo = run(&snap);
        assert_eq!(
            geo.answer_range,
            Some(AnswerRange {
                low: 4,
                high: 10,
                mid: Some(7)
            })
        );
        let row = &geo.rows[0];
        assert!(!row.pointers_drawn);
        assert!(row.cells.iter().all(|c| c.label.is_none() && c.in_range));
    }

    #[test]
    fn prefix_rows_stack_vertically() {
        let snap = Snapshot::new(2, Event::Line)
            .with_binding("arr", json!([1, 2, 3]))
            .with_binding("psum", json!([1, 3, 6]))
            .with_binding("L", json!(1))
            .with_binding("R", json!(2));
        let geo = run(&snap);
        assert_eq!(geo.rows.len(), 2);
        assert_eq!(geo.rows[1].name, "psum");
        assert_eq!(geo.rows[1].cells[2].position, Point::new(2.0 * CELL_WIDTH, ROW_HEIGHT));
        assert!(!geo.rows[1].cells[0].in_range);
    }
}
