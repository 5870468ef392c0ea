//! Canonicalization of configuration trees before comparison.

use serde_json::{Map, Value};

/// Remove semantically-empty members at every nesting depth.
///
/// A member is empty when its value is `null`, `""`, `[]`, or `{}` after its
/// own children have been canonicalized. `0` and `false` are meaningful and
/// kept. Sequences keep their order and their elements; only object members
/// are pruned.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, member) in map {
                let member = canonicalize(member);
                if !is_empty(&member) {
                    out.insert(key.clone(), member);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Remove the given dotted secret paths from a tree.
///
/// Returns the stripped copy and whether any secret path held a non-empty
/// value. The remote never echoes secrets back, so they are excluded from
/// comparison and tracked by presence only.
pub fn split_secrets(value: &Value, paths: &[&str]) -> (Value, bool) {
    let mut stripped = value.clone();
    let mut present = false;
    for path in paths {
        if let Some(removed) = remove_path(&mut stripped, path) {
            if !is_empty(&removed) {
                present = true;
            }
        }
    }
    (stripped, present)
}

fn remove_path(value: &mut Value, path: &str) -> Option<Value> {
    let map = value.as_object_mut()?;
    match path.split_once('.') {
        None => map.remove(path),
        Some((head, rest)) => remove_path(map.get_mut(head)?, rest),
    }
}

pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
