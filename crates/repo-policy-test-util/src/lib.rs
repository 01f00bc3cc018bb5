//! Shared test utilities for the repo-policy workspace.
//!
//! `xtask` needs `normalize_nondeterministic` at runtime, so this lives in its own crate instead
//! of a `#[cfg(test)]` module.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize non-deterministic fields of a report envelope for golden-file comparison.
///
/// `started_at` and `finished_at` are replaced at the root. `tool.version` is replaced only
/// when the root looks like an envelope (`schema`, `tool`, `result`).
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };

    for key in ["started_at", "finished_at"] {
        if obj.contains_key(key) {
            obj.insert(key.to_string(), Value::String(TIMESTAMP_PLACEHOLDER.to_string()));
        }
    }

    let is_envelope =
        obj.contains_key("schema") && obj.contains_key("tool") && obj.contains_key("result");
    if is_envelope
        && let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert(
            "version".to_string(),
            Value::String(VERSION_PLACEHOLDER.to_string()),
        );
    }

    value
}
