//! Search arrays with a target drawn from their own values

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_ARRAY_SIZE: usize = 1;
pub const MAX_ARRAY_SIZE: usize = 20;
/// Exclusive upper bound for random values
const RANDOM_VALUE_BOUND: i64 = 100;

/// Shape of a generated array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
    /// Strictly increasing odd numbers `1, 3, 5, ...`
    #[default]
    Sorted,
    /// Independent uniform draws in `[0, 100)`
    Random,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKind::Sorted => write!(f, "sorted"),
            ArrayKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for ArrayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sorted" => Ok(ArrayKind::Sorted),
            "random" => Ok(ArrayKind::Random),
            other => Err(format!("unknown array kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArray {
    pub values: Vec<i64>,
    /// Always one of `values`
    pub target: i64,
    /// Injectable source text: literal, target and driver call
    pub snippet: String,
}

/// Generate an array of `size` elements (clamped to `[1, 20]`) and a search
/// target drawn from it.
pub fn generate_array<R: Rng + ?Sized>(rng: &mut R, size: usize, kind: ArrayKind) -> GeneratedArray {
    let size = size.clamp(MIN_ARRAY_SIZE, MAX_ARRAY_SIZE);
    let values: Vec<i64> = match kind {
        ArrayKind::Sorted => (0..size as i64).map(|i| 2 * i + 1).collect(),
        ArrayKind::Random => (0..size)
            .map(|_| rng.random_range(0..RANDOM_VALUE_BOUND))
            .collect(),
    };
    let target = values[rng.random_range(0..values.len())];
    let snippet = array_snippet(&values, target);

    GeneratedArray {
        values,
        target,
        snippet,
    }
}

fn array_snippet(values: &[i64], target: i64) -> String {
    let literal = values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "\n# Generated test case (size: {size})\n\
         arr = [{literal}]\n\
         target = {target}\n\
         result = binary_search(arr, target)\n\
         print(f\"Index of {{target}}: {{result}}\")\n",
        size = values.len(),
    )
}
