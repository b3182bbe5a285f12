//! Shared test utilities for the itemguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), and the CLI integration tests need to
//! build item JSON without depending on the domain model.

use serde_json::{Value, json};

const TIMESTAMP_KEYS: &[&str] = &["generated_at", "at", "timestamp"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Root-only: when the value is a report envelope (`schema`, `id`, `tool`,
/// `body`), `tool.version` becomes `"__VERSION__"` and the millis suffix of
/// `id` becomes `__MILLIS__`.
///
/// Recursive: `generated_at`, `at` and `timestamp` string fields become
/// `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "id", "tool", "body"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope {
            if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
                && tool.contains_key("version")
            {
                tool.insert(
                    "version".to_string(),
                    Value::String("__VERSION__".to_string()),
                );
            }
            if let Some(Value::String(id)) = obj.get_mut("id")
                && let Some((stem, millis)) = id.rsplit_once('_')
                && !millis.is_empty()
                && millis.bytes().all(|b| b.is_ascii_digit())
            {
                *id = format!("{stem}___MILLIS__");
            }
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(*key)
                    && v.is_string()
                {
                    *v = Value::String("__TIMESTAMP__".to_string());
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

/// `{"kind": KIND, "amount": 1}`.
pub fn item_json(kind: &str) -> Value {
    json!({ "kind": kind, "amount": 1 })
}

/// An item with the given `meta` object.
pub fn item_with_meta(kind: &str, meta: Value) -> Value {
    json!({ "kind": kind, "amount": 1, "meta": meta })
}

/// An item carrying `[tag, level]` enchantment pairs.
pub fn enchanted_item_json(kind: &str, enchants: &[(&str, u32)]) -> Value {
    let pairs: Vec<Value> = enchants
        .iter()
        .map(|(tag, level)| json!([tag, level]))
        .collect();
    item_with_meta(kind, json!({ "enchantments": pairs }))
}

/// One world-snapshot entity with items in slots `0..n`.
pub fn entity_json(id: &str, items: Vec<Value>) -> Value {
    let slots: Vec<Value> = items
        .into_iter()
        .enumerate()
        .map(|(slot, item)| json!({ "slot": slot, "item": item }))
        .collect();
    json!({ "id": id, "slots": slots })
}
