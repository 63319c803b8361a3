//! Field-level merge primitives.
//!
//! All of them give precedence to the target: a value the target already
//! holds is kept, gaps are filled from the source. Collections are unioned
//! with the target's entries first. Applying any of them twice with the same
//! source is a no-op the second time.

use serde_json::{Map, Value};

/// Whether an optional string carries visible text.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Fill an unset option from the source.
pub(crate) fn merge_option<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

/// Fill a blank string from the source.
pub(crate) fn merge_text(target: &mut Option<String>, source: &Option<String>) {
    if is_blank(target.as_deref()) && !is_blank(source.as_deref()) {
        target.clone_from(source);
    }
}

/// Fill a zero (unset) number from the source.
pub(crate) fn merge_number(target: &mut u32, source: u32) {
    if *target == 0 {
        *target = source;
    }
}

/// Add keys only present in the source, after the target's own keys.
pub(crate) fn merge_map(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if !target.contains_key(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Append source items the target does not hold yet, in source order.
pub(crate) fn merge_ordered_set<T: Clone + PartialEq>(target: &mut Vec<T>, source: &[T]) {
    for item in source {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// Like [`merge_ordered_set`], but items are identified by a key; the
/// target's item wins when both sides carry the same key.
pub(crate) fn merge_keyed<T, K, F>(target: &mut Vec<T>, source: &[T], key: F)
where
    T: Clone,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    for item in source {
        let k = key(item);
        if !target.iter().any(|existing| key(existing) == k) {
            target.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_map_union_keeps_target_values() {
        let mut target = map(json!({"x": 1}));
        let source = map(json!({"x": 2, "y": 3}));
        merge_map(&mut target, &source);
        assert_eq!(Value::Object(target), json!({"x": 1, "y": 3}));
    }

    #[test]
    fn test_map_union_preserves_insertion_order() {
        let mut target = map(json!({"b": 1}));
        let source = map(json!({"z": 2, "a": 3}));
        merge_map(&mut target, &source);
        let keys: Vec<&str> = target.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "z", "a"]);
    }

    #[test]
    fn test_ordered_set_deduplicates() {
        let mut target = vec!["one".to_string(), "two".to_string()];
        let source = vec!["two".to_string(), "three".to_string()];
        merge_ordered_set(&mut target, &source);
        merge_ordered_set(&mut target, &source);
        assert_eq!(target, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_blank_text_is_filled() {
        let mut target = Some("  ".to_string());
        merge_text(&mut target, &Some("https://repo".to_string()));
        assert_eq!(target.as_deref(), Some("https://repo"));

        let mut target = Some("mine".to_string());
        merge_text(&mut target, &Some("theirs".to_string()));
        assert_eq!(target.as_deref(), Some("mine"));
    }

    #[test]
    fn test_zero_is_unset() {
        let mut timeout = 0;
        merge_number(&mut timeout, 60);
        assert_eq!(timeout, 60);
        merge_number(&mut timeout, 90);
        assert_eq!(timeout, 60);
    }
}
