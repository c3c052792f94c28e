//! Additive snapshot merge: last-writer-wins by identifier.
//!
//! Merging happens on raw JSON records rather than typed entities so a
//! partial incoming record overlays only the fields it carries. Typed
//! re-entry happens afterwards, through the same legacy-upgrade path used on
//! snapshot load.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;

/// Combine two record lists keyed by their `"id"` field.
///
/// Existing entries keep their position; fields from a matching incoming
/// record win, but fields the incoming record does not carry survive. New
/// ids are appended in incoming order. Incoming items without a non-empty
/// string id are dropped. Nothing is ever deleted.
pub fn merge_by_id(current: &[Value], incoming: &[Value]) -> Vec<Value> {
    let mut by_id: IndexMap<String, Value> = IndexMap::new();

    for record in current {
        if let Some(id) = record_id(record) {
            by_id.insert(id, record.clone());
        }
    }

    for record in incoming {
        let Some(id) = record_id(record) else {
            continue;
        };
        match by_id.entry(id) {
            Entry::Occupied(mut existing) => overlay(existing.get_mut(), record),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }
    }

    by_id.into_values().collect()
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        _ => None,
    }
}

fn overlay(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(base), Value::Object(update)) => {
            for (key, value) in update {
                base.insert(key.clone(), value.clone());
            }
        }
        (existing, incoming) => *existing = incoming.clone(),
    }
}
