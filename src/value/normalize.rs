//! Raw binding → [`Value`] normalization
//!
//! Trace steps arrive as JSON. Values the tracer could serialize arrive
//! structured; everything else arrives as its textual form (for example a
//! Python `set` or an object). Normalization never fails: text that is not
//! unambiguously a bracketed list or a braced map stays [`Value::Unknown`].

use super::{Scalar, Value};
use serde_json::Value as Json;

/// Normalize a raw top-level binding value.
///
/// Lists and maps are wrapped directly, preserving element and key order.
/// Strings get one parse attempt when they are `[...]` or `{...}` delimited.
pub fn normalize(raw: &Json) -> Value {
    match raw {
        Json::String(text) => normalize_text(text),
        other => structural(other),
    }
}

/// Attempt to give a textual value a shape.
///
/// Only a single parse pass is made, and only when the trimmed text starts
/// and ends with a matching bracket or brace pair.
pub fn normalize_text(text: &str) -> Value {
    let trimmed = text.trim();
    if is_delimited(trimmed) {
        if let Ok(parsed @ (Json::Array(_) | Json::Object(_))) =
            serde_json::from_str::<Json>(trimmed)
        {
            return structural(&parsed);
        }
    }
    Value::Unknown(text.to_string())
}

fn is_delimited(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('[') && text.ends_with(']'))
            || (text.starts_with('{') && text.ends_with('}')))
}

/// Shape-preserving conversion; nested strings are kept as scalars
fn structural(raw: &Json) -> Value {
    match raw {
        Json::Null => Value::Unknown("None".to_string()),
        Json::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Scalar(Scalar::Int(i)),
            None => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        Json::String(s) => Value::Scalar(Scalar::Str(s.clone())),
        Json::Array(items) => Value::Sequence(items.iter().map(structural).collect()),
        Json::Object(map) => Value::Mapping(
            map.iter()
                .map(|(key, item)| (key.clone(), structural(item)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_input_wraps_directly() {
        let value = normalize(&json!({"b": [1, 2], "a": "x"}));
        let map = value.as_mapping().expect("mapping");
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(map["a"], Value::Scalar(Scalar::Str("x".into())));
    }

    #[test]
    fn bracketed_text_is_parsed() {
        let value = normalize(&json!(" [1, 2.5, true] "));
        assert_eq!(
            value,
            Value::Sequence(vec![
                Value::Scalar(Scalar::Int(1)),
                Value::Scalar(Scalar::Float(2.5)),
                Value::Scalar(Scalar::Bool(true)),
            ])
        );
    }

    #[test]
    fn ambiguous_text_stays_unknown() {
        // Python set repr: braces, but not a parseable map
        assert_eq!(
            normalize(&json!("{'A', 'B'}")),
            Value::Unknown("{'A', 'B'}".into())
        );
        assert_eq!(normalize(&json!("hello")), Value::Unknown("hello".into()));
        assert_eq!(normalize(&json!("[1, 2")), Value::Unknown("[1, 2".into()));
        assert_eq!(normalize(&json!("[")), Value::Unknown("[".into()));
    }

    #[test]
    fn nested_text_is_not_reinterpreted() {
        let value = normalize(&json!(["[1, 2]"]));
        assert_eq!(
            value,
            Value::Sequence(vec![Value::Scalar(Scalar::Str("[1, 2]".into()))])
        );
    }

    #[test]
    fn null_and_numbers() {
        assert_eq!(normalize(&json!(null)), Value::Unknown("None".into()));
        assert_eq!(normalize(&json!(7)), Value::Scalar(Scalar::Int(7)));
        assert_eq!(normalize(&json!(1.5)), Value::Scalar(Scalar::Float(1.5)));
    }
}
