//! Sorting bars layout
//!
//! Each element of `arr` is a bar whose height is proportional to its value
//! relative to the array maximum, with a minimum floor so zero and negative
//! values stay visible. Any other integer binding that is a valid index into
//! `arr` is a pointer and is listed under its bar.

use super::Point;
use crate::classify::Classification;
use crate::snapshot::Snapshot;
use crate::value::Value;
use serde::Serialize;

pub const MAX_BAR_HEIGHT: f64 = 200.0;
pub const MIN_BAR_HEIGHT: f64 = 4.0;
pub const BAR_WIDTH: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub index: usize,
    pub value: String,
    pub height: f64,
    /// Bottom-left corner of the bar
    pub position: Point,
    /// Names of the pointer bindings at this index, in recorded order
    pub pointers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SortingGeometry {
    pub bars: Vec<Bar>,
    pub max_value: Option<f64>,
}

/// Bar height for `value` given the array maximum
pub fn bar_height(value: Option<f64>, max: Option<f64>) -> f64 {
    match (value, max) {
        (Some(v), Some(m)) if m > 0.0 => (v / m * MAX_BAR_HEIGHT).max(MIN_BAR_HEIGHT),
        _ => MIN_BAR_HEIGHT,
    }
}

pub fn layout_sorting(_classification: &Classification, snapshot: &Snapshot) -> SortingGeometry {
    let Some(arr) = snapshot.binding("arr").filter(Value::is_flat_sequence) else {
        return SortingGeometry::default();
    };
    let items = arr.as_sequence().unwrap_or_default();

    let max_value = items
        .iter()
        .filter_map(Value::as_f64)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));

    let mut bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(index, item)| Bar {
            index,
            value: item.label(),
            height: bar_height(item.as_f64(), max_value),
            position: Point::new(index as f64 * BAR_WIDTH, MAX_BAR_HEIGHT),
            pointers: Vec::new(),
        })
        .collect();

    for (name, index) in snapshot.index_pointers("arr", bars.len()) {
        bars[index].pointers.push(name);
    }

    SortingGeometry { bars, max_value }
}
