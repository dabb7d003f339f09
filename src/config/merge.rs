//! Field-by-field merging of configuration tiers.
//!
//! Objects merge recursively; every other value in a higher tier replaces the
//! lower one. `null` means "not specified" and leaves the lower value alone.

use serde_json::Value;

/// Merge `overlay` onto `base`, with `overlay` taking precedence.
///
/// # Example
/// ```
/// use serde_json::json;
/// use plannavi_dashboard::config::deep_merge;
///
/// let defaults = json!({ "dashboard": { "upcoming_limit": 5, "this_week_days": 7 } });
/// let project = json!({ "dashboard": { "upcoming_limit": 10 } });
/// let merged = deep_merge(defaults, project);
/// assert_eq!(merged["dashboard"]["upcoming_limit"], 10);
/// assert_eq!(merged["dashboard"]["this_week_days"], 7);
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(layer)) => {
            for (key, value) in layer {
                let combined = match merged.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                merged.insert(key, combined);
            }
            Value::Object(merged)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later tiers winning.
pub fn deep_merge_all(tiers: impl IntoIterator<Item = Value>) -> Value {
    tiers.into_iter().fold(Value::Null, deep_merge)
}
