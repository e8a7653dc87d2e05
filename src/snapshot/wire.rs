//! Trace step records as the execution backend sends them

use super::{Event, Snapshot};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A single step record from the backend's trace list
///
/// Regular steps carry `line`, `locals`, `event` and `func_name`. A failed
/// run ends with a record whose event is `"error"` and which carries only
/// `error` and `traceback`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStep {
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub locals: IndexMap<String, Json>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub func_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub traceback: Option<String>,
}

/// Convert backend step records into snapshots, in order
pub fn snapshots_from_steps(steps: Vec<RawStep>) -> Vec<Snapshot> {
    let mut snapshots: Vec<Snapshot> = Vec::with_capacity(steps.len());
    for step in steps {
        let event = Event::from_tag(&step.event);
        // Error records have no line of their own; pin them to the last step
        let position = step
            .line
            .or_else(|| snapshots.last().map(|s| s.position))
            .unwrap_or(0);

        let error = match (step.error, step.traceback) {
            (Some(message), Some(tb)) if !tb.is_empty() => Some(format!("{}\n{}", message, tb)),
            (Some(message), _) => Some(message),
            (None, Some(tb)) if event == Event::Exception => Some(tb),
            _ => None,
        };

        snapshots.push(Snapshot {
            position,
            event,
            bindings: step.locals,
            function_name: step.func_name,
            error,
        });
    }
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_tracer_records() {
        let steps: Vec<RawStep> = serde_json::from_value(json!([
            {"line": 2, "locals": {"arr": [1, 2], "x": 1}, "event": "call", "func_name": "f"},
            {"line": 3, "locals": {"__return__": "None"}, "event": "return", "func_name": "f"},
            {"event": "error", "error": "boom", "traceback": "Traceback..."}
        ]))
        .unwrap();

        let snaps = snapshots_from_steps(steps);
        assert_eq!(snaps.len(), 3);
        assert_eq!(snaps[0].event, Event::Call);
        assert_eq!(snaps[0].function_name.as_deref(), Some("f"));
        let names: Vec<&str> = snaps[0].bindings.keys().map(String::as_str).collect();
        assert_eq!(names, ["arr", "x"]);

        assert_eq!(snaps[2].event, Event::Exception);
        assert_eq!(snaps[2].position, 3);
        assert!(snaps[2].bindings.is_empty());
        assert_eq!(snaps[2].error.as_deref(), Some("boom\nTraceback..."));
    }
}
