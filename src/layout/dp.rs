//! Dynamic-programming state layout
//!
//! Two shapes are supported:
//!
//! - a 2-D `dp` table, drawn as a grid with the `(i, w)` cell active and the
//!   whole row `i` dimly highlighted
//! - a `memo` mapping, drawn as one tile per key, sorted numerically, with
//!   the tile for the current `n` highlighted
//!
//! Zero-valued cells are de-emphasized. This is a readability aid only.

use super::Point;
use crate::classify::{is_table, Classification, DP_COLUMN_POINTERS};
use crate::snapshot::Snapshot;
use crate::value::Value;
use serde::Serialize;
use std::cmp::Ordering;

pub const CELL_WIDTH: f64 = 48.0;
pub const CELL_HEIGHT: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DpGeometry {
    Table(DpTable),
    Memo(MemoTiles),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpTable {
    pub rows: usize,
    pub columns: usize,
    pub cells: Vec<DpCell>,
    pub active: Option<(usize, usize)>,
    pub active_row: Option<usize>,
}

impl DpTable {
    pub fn cell(&self, row: usize, col: usize) -> Option<&DpCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpCell {
    pub row: usize,
    pub col: usize,
    pub value: String,
    pub position: Point,
    pub active: bool,
    pub in_active_row: bool,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoTiles {
    pub tiles: Vec<MemoTile>,
    /// Display text of the current `n`, if any
    pub current: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoTile {
    pub key: String,
    pub value: String,
    pub position: Point,
    pub active: bool,
}

pub fn layout_dp(_classification: &Classification, snapshot: &Snapshot) -> DpGeometry {
    if let Some(dp) = snapshot.binding("dp").filter(is_table) {
        return DpGeometry::Table(layout_table(&dp, snapshot));
    }
    if let Some(Value::Mapping(memo)) = snapshot.binding("memo") {
        let current = snapshot.binding("n").filter(|n| n.as_text().is_some());
        return DpGeometry::Memo(layout_memo(&memo, current.as_ref()));
    }
    DpGeometry::Empty
}

fn to_index(n: i64) -> Option<usize> {
    usize::try_from(n).ok()
}

fn layout_table(dp: &Value, snapshot: &Snapshot) -> DpTable {
    let rows: Vec<&[Value]> = dp
        .as_sequence()
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_sequence)
        .collect();
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    let active_row = snapshot
        .int_binding("i")
        .and_then(to_index)
        .filter(|&i| i < rows.len());
    let active_col = snapshot
        .first_int_binding(&DP_COLUMN_POINTERS)
        .and_then(|(_, w)| to_index(w));
    let active = match (active_row, active_col) {
        (Some(i), Some(w)) if w < rows[i].len() => Some((i, w)),
        _ => None,
    };

    let cells = rows
        .iter()
        .enumerate()
        .flat_map(|(row, items)| {
            items.iter().enumerate().map(move |(col, item)| DpCell {
                row,
                col,
                value: item.label(),
                position: Point::new(col as f64 * CELL_WIDTH, row as f64 * CELL_HEIGHT),
                active: active == Some((row, col)),
                in_active_row: active_row == Some(row),
                dimmed: item.is_zero(),
            })
        })
        .collect();

    DpTable {
        rows: rows.len(),
        columns,
        cells,
        active,
        active_row,
    }
}

/// Numeric keys first in numeric order, then the rest lexicographically
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn key_matches(key: &str, current: &Value) -> bool {
    match (key.trim().parse::<f64>(), current.as_f64()) {
        (Ok(k), Some(n)) => k == n,
        _ => key == current.label(),
    }
}

fn layout_memo(memo: &indexmap::IndexMap<String, Value>, current: Option<&Value>) -> MemoTiles {
    let mut entries: Vec<(&String, &Value)> = memo.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    let tiles = entries
        .into_iter()
        .enumerate()
        .map(|(index, (key, value))| MemoTile {
            key: key.clone(),
            value: value.label(),
            position: Point::new(index as f64 * CELL_WIDTH, 0.0),
            active: current.is_some_and(|n| key_matches(key, n)),
        })
        .collect();

    MemoTiles {
        tiles,
        current: current.map(Value::label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::snapshot::Event;
    use serde_json::json;

    fn run(snapshot: &Snapshot) -> DpGeometry {
        layout_dp(&classify(snapshot), snapshot)
    }

    #[test]
    fn knapsack_table_step() {
        let snap = Snapshot::new(7, Event::Line)
            .with_binding("dp", json!([[0, 0], [0, 5]]))
            .with_binding("i", json!(1))
            .with_binding("w", json!(1));
        let DpGeometry::Table(table) = run(&snap) else {
            panic!("expected a table");
        };

        let active = table.cell(1, 1).unwrap();
        assert!(active.active && active.in_active_row && !active.dimmed);
        assert!(table.cell(1, 0).unwrap().in_active_row);
        assert!(!table.cell(0, 1).unwrap().in_active_row);
        assert!(table.cell(0, 0).unwrap().dimmed);
        assert_eq!(table.active, Some((1, 1)));
        assert_eq!(table.cells.iter().filter(|c| c.active).count(), 1);
    }

    #[test]
    fn out_of_bounds_pointers_are_ignored() {
        let snap = Snapshot::new(7, Event::Line)
            .with_binding("dp", json!([[1, 2], [3]]))
            .with_binding("i", json!(1))
            .with_binding("j", json!(1));
        let DpGeometry::Table(table) = run(&snap) else {
            panic!("expected a table");
        };
        assert_eq!(table.active, None);
        assert_eq!(table.active_row, Some(1));
        assert_eq!((table.rows, table.columns), (2, 2));
    }

    #[test]
    fn memo_tiles_sorted_numerically() {
        let snap = Snapshot::new(3, Event::Call)
            .with_binding("memo", json!({"10": 55, "2": 1, "1": 1, "x": 0}))
            .with_binding("n", json!(2));
        let DpGeometry::Memo(memo) = run(&snap) else {
            panic!("expected memo tiles");
        };
        let keys: Vec<&str> = memo.tiles.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["1", "2", "10", "x"]);
        let active: Vec<&str> = memo
            .tiles
            .iter()
            .filter(|t| t.active)
            .map(|t| t.key.as_str())
            .collect();
        assert_eq!(active, ["2"]);
        assert_eq!(memo.current.as_deref(), Some("2"));
    }
}
