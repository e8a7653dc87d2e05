// Trace snapshots for time-travel replay

pub mod wire;

use crate::value::{normalize, Value};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Json;

pub use wire::{snapshots_from_steps, RawStep};

/// What the tracer observed when it recorded a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Line,
    Call,
    Return,
    Exception,
}

impl Event {
    /// Map a tracer event tag; unrecognized tags are treated as line events
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "call" => Event::Call,
            "return" => Event::Return,
            "exception" | "error" => Event::Exception,
            _ => Event::Line,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Event::Line => "line",
            Event::Call => "call",
            Event::Return => "return",
            Event::Exception => "exception",
        }
    }
}

/// One recorded instant of program execution
///
/// Bindings keep the raw JSON the backend sent; [`Snapshot::binding`]
/// normalizes on access so every consumer sees a [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub position: u32,
    pub event: Event,
    pub bindings: IndexMap<String, Json>,
    pub function_name: Option<String>,
    /// Error message (and traceback) for exception steps
    pub error: Option<String>,
}

impl Snapshot {
    pub fn new(position: u32, event: Event) -> Self {
        Snapshot {
            position,
            event,
            bindings: IndexMap::new(),
            function_name: None,
            error: None,
        }
    }

    /// Add a binding (builder style)
    pub fn with_binding(mut self, name: impl Into<String>, raw: Json) -> Self {
        self.bindings.insert(name.into(), raw);
        self
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Normalized value of a binding
    pub fn binding(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).map(normalize)
    }

    /// Integer value of a binding, if it is an integer scalar
    pub fn int_binding(&self, name: &str) -> Option<i64> {
        self.binding(name).and_then(|v| v.as_i64())
    }

    /// First binding among `names` that holds an integer, with its name
    pub fn first_int_binding<'a>(&self, names: &[&'a str]) -> Option<(&'a str, i64)> {
        names
            .iter()
            .find_map(|name| self.int_binding(name).map(|n| (*name, n)))
    }

    /// Integer bindings (other than `exclude`) that are valid indices into a
    /// sequence of length `len`, in recorded order
    pub fn index_pointers(&self, exclude: &str, len: usize) -> Vec<(String, usize)> {
        self.bindings
            .keys()
            .filter(|name| name.as_str() != exclude && !name.starts_with("__"))
            .filter_map(|name| {
                let index = self.int_binding(name)?;
                let index = usize::try_from(index).ok().filter(|&i| i < len)?;
                Some((name.clone(), index))
            })
            .collect()
    }

    /// Whether the function name contains any keyword (case-insensitive)
    pub fn function_matches(&self, keywords: &[&str]) -> bool {
        let Some(name) = &self.function_name else {
            return false;
        };
        let name = name.to_ascii_lowercase();
        keywords.iter().any(|kw| name.contains(kw))
    }

    /// Normalized bindings, in recorded order
    pub fn normalized_bindings(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.bindings
            .iter()
            .map(|(name, raw)| (name.as_str(), normalize(raw)))
    }
}
