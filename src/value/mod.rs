//! Binding value representation
//!
//! This module defines the [`Value`] enum, the tagged union every downstream
//! component sees in place of the raw JSON a trace step carries. Raw binding
//! values are turned into [`Value`]s by the [`normalize`] module.
//!
//! # Value Shapes
//!
//! - [`Value::Scalar`]: a string, integer, float or boolean ([`Scalar`])
//! - [`Value::Sequence`]: an ordered list of values
//! - [`Value::Mapping`]: name → value, insertion order preserved
//! - [`Value::Unknown`]: raw text that could not be given a shape
//!
//! # Nested Text
//!
//! Only the top-level binding is opportunistically parsed. Strings nested
//! inside a sequence or mapping stay [`Scalar::Str`] until a consumer asks for
//! [`Value::promote`].

pub mod normalize;

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

pub use normalize::{normalize, normalize_text};

/// A primitive binding value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Numeric view of the scalar (booleans and strings are not numbers)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compare two scalars, treating `Int` and `Float` as the same number line
    pub fn loosely_eq(&self, other: &Scalar) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(true) => write!(f, "True"),
            Scalar::Bool(false) => write!(f, "False"),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Shape-tagged binding value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
    Unknown(String),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Get the integer value, returns None if not an integer scalar
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get a numeric value (integer or float)
    pub fn as_f64(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    /// A sequence whose every element is a scalar
    pub fn is_flat_sequence(&self) -> bool {
        self.as_sequence()
            .is_some_and(|items| items.iter().all(|item| item.as_scalar().is_some()))
    }

    /// Zero-valued for display purposes: numeric zero or `False`
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Scalar(Scalar::Bool(b)) => !b,
            other => other.as_f64() == Some(0.0),
        }
    }

    /// Scalar equality across numeric representations; structures never match.
    ///
    /// Top-level strings normalize to [`Value::Unknown`] while strings inside
    /// a sequence stay [`Scalar::Str`], so the two compare by their text.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a.loosely_eq(b),
            (Value::Unknown(a), Value::Scalar(Scalar::Str(b)))
            | (Value::Scalar(Scalar::Str(a)), Value::Unknown(b))
            | (Value::Unknown(a), Value::Unknown(b)) => a == b,
            _ => false,
        }
    }

    /// Bare text of a scalar or unshaped binding, e.g. a node name
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Scalar(s) => Some(s.to_string()),
            Value::Unknown(raw) => Some(raw.clone()),
            _ => None,
        }
    }

    /// Label text for a cell or node: scalars print bare, everything else
    /// uses the compact [`Display`](fmt::Display) form
    pub fn label(&self) -> String {
        match self {
            Value::Scalar(s) => s.to_string(),
            Value::Unknown(raw) => raw.clone(),
            other => other.to_string(),
        }
    }

    /// Re-run text normalization on a nested string.
    ///
    /// Structured values and text that does not parse are returned as-is.
    pub fn promote(&self) -> Cow<'_, Value> {
        let text = match self {
            Value::Scalar(Scalar::Str(s)) | Value::Unknown(s) => s,
            _ => return Cow::Borrowed(self),
        };
        match normalize_text(text) {
            promoted @ (Value::Sequence(_) | Value::Mapping(_)) => Cow::Owned(promoted),
            _ => Cow::Borrowed(self),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(Scalar::Str(s)) => write!(f, "'{}'", s),
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}': {}", key, item)?;
                }
                write!(f, "}}")
            }
            Value::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}
