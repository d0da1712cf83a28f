//! Recursive merge for JSON payloads.

use serde_json::Value;

/// Merges `overlay` into `base`, in place.
///
/// When both sides are objects the merge recurses key by key. Any other
/// pairing (scalar, array, null, or mismatched kinds) replaces the base
/// value wholesale; arrays are never concatenated.
pub(crate) fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value.clone(),
    }
}

/// Returns `base` with `overlay` merged over it.
pub(crate) fn merged(mut base: Value, overlay: &Value) -> Value {
    deep_merge(&mut base, overlay);
    base
}
