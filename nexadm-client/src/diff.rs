//! Drift detection between desired and observed configuration.

use serde_json::Value;

/// One-directional containment match.
///
/// Every member of `desired` must be present in `observed` with a matching
/// value, recursively for nested mappings; members only in `observed` are
/// ignored, so server-owned metadata never registers as drift. Sequences and
/// scalars compare by equality. Both sides are expected to be canonicalized.
pub fn matches(desired: &Value, observed: &Value) -> bool {
    match (desired, observed) {
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(key, value)| have.get(key).is_some_and(|other| matches(value, other))),
        _ => desired == observed,
    }
}
