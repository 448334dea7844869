//! Path-based field extraction from raw JSON records.
//!
//! Every extractor follows the same policy: a missing path, a `null` along the
//! way or a value of the wrong shape yields the documented default (empty
//! string, zero, empty list, false). Absence is never an error.

use serde_json::Value;

/// Walk `path` from `value`, treating `null` as absent.
pub fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Whether `path` leads to a non-null value.
pub fn has(value: &Value, path: &[&str]) -> bool {
    value_at(value, path).is_some()
}

/// String at `path`. Numbers and booleans are rendered; default `""`.
pub fn str_at(value: &Value, path: &[&str]) -> String {
    match value_at(value, path) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => canonical_number(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// First non-empty string among several candidate paths.
pub fn str_at_any(value: &Value, paths: &[&[&str]]) -> String {
    paths
        .iter()
        .map(|path| str_at(value, path))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Integer at `path`; numeric strings ("+12") are accepted; default `0`.
pub fn int_at(value: &Value, path: &[&str]) -> i64 {
    match value_at(value, path) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_decimal(s).map(|f| f.trunc() as i64).unwrap_or(0),
        _ => 0,
    }
}

/// First path that holds a number.
pub fn int_at_any(value: &Value, paths: &[&[&str]]) -> i64 {
    paths
        .iter()
        .find(|path| is_numeric(value_at(value, path)))
        .map(|path| int_at(value, path))
        .unwrap_or(0)
}

pub fn i32_at(value: &Value, path: &[&str]) -> i32 {
    clamp_i32(int_at(value, path))
}

/// Non-negative integer at `path`; negative values clamp to `0`.
pub fn u32_at(value: &Value, path: &[&str]) -> u32 {
    u32::try_from(int_at(value, path).max(0)).unwrap_or(u32::MAX)
}

pub fn clamp_i32(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(if n < 0 { i32::MIN } else { i32::MAX })
}

/// Boolean at `path`; default `false`.
///
/// Older records store flags as strings, so `"true"` and a non-empty marker
/// value such as `"basic"` also count as set.
pub fn bool_at(value: &Value, path: &[&str]) -> bool {
    match value_at(value, path) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            !s.is_empty() && !s.eq_ignore_ascii_case("false")
        }
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Ordered list of strings at `path`; default empty.
///
/// Scalar entries are rendered; objects contribute their `value` or `type`
/// field when present.
pub fn list_at(value: &Value, path: &[&str]) -> Vec<String> {
    array_at(value, path)
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(canonical_number(n)),
            Value::Object(_) => Some(str_at_any(entry, &[&["value"], &["type"]])),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Array at `path`; default empty slice.
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    match value_at(value, path) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Key/value pairs of the object at `path`, in document order.
pub fn entries_at<'a>(value: &'a Value, path: &[&str]) -> Vec<(&'a str, &'a Value)> {
    match value_at(value, path) {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        _ => Vec::new(),
    }
}

/// Modifier at `path` in canonical decimal form (`29`, `"+29"` and `29.0`
/// all become `"29"`); default `""`.
pub fn modifier_at(value: &Value, path: &[&str]) -> String {
    match value_at(value, path) {
        Some(Value::Number(n)) => canonical_number(n),
        Some(Value::String(s)) => match parse_decimal(s) {
            Some(f) => canonical_f64(f),
            None => s.trim().to_string(),
        },
        _ => String::new(),
    }
}

/// Canonical decimal rendering of a JSON number.
pub fn canonical_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(canonical_f64).unwrap_or_default()
    }
}

fn canonical_f64(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn is_numeric(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(_)) => true,
        Some(Value::String(s)) => parse_decimal(s).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_paths_default() {
        let raw = json!({"system": {"bonus": {"value": null}}});
        assert_eq!(str_at(&raw, &["system", "bonus", "value"]), "");
        assert_eq!(int_at(&raw, &["system", "missing"]), 0);
        assert!(!bool_at(&raw, &["system", "bonus"]));
        assert!(list_at(&raw, &["system", "traits", "value"]).is_empty());
        assert!(!has(&raw, &["system", "bonus", "value"]));
    }

    #[test]
    fn modifiers_are_canonical() {
        let raw = json!({"a": 29, "b": "+29", "c": 29.0, "d": -1, "e": 0.5, "f": "see text"});
        assert_eq!(modifier_at(&raw, &["a"]), "29");
        assert_eq!(modifier_at(&raw, &["b"]), "29");
        assert_eq!(modifier_at(&raw, &["c"]), "29");
        assert_eq!(modifier_at(&raw, &["d"]), "-1");
        assert_eq!(modifier_at(&raw, &["e"]), "0.5");
        assert_eq!(modifier_at(&raw, &["f"]), "see text");
        assert_eq!(modifier_at(&raw, &["g"]), "");
    }

    #[test]
    fn integers_accept_numeric_strings() {
        let raw = json!({"a": "12", "b": 7.9, "c": "+3", "d": "x"});
        assert_eq!(int_at(&raw, &["a"]), 12);
        assert_eq!(int_at(&raw, &["b"]), 7);
        assert_eq!(int_at(&raw, &["c"]), 3);
        assert_eq!(int_at(&raw, &["d"]), 0);
        assert_eq!(u32_at(&json!({"n": -4}), &["n"]), 0);
    }

    #[test]
    fn int_at_any_uses_first_numeric_path() {
        let raw = json!({"hp": {"max": null, "value": 45}});
        assert_eq!(int_at_any(&raw, &[&["hp", "max"], &["hp", "value"]]), 45);
    }

    #[test]
    fn bool_accepts_marker_strings() {
        let raw = json!({"a": true, "b": "basic", "c": "", "d": "false"});
        assert!(bool_at(&raw, &["a"]));
        assert!(bool_at(&raw, &["b"]));
        assert!(!bool_at(&raw, &["c"]));
        assert!(!bool_at(&raw, &["d"]));
    }

    #[test]
    fn lists_preserve_order_and_skip_blanks() {
        let raw = json!({"traits": {"value": ["evil", "", "dragon", 3, {"type": "fire"}]}});
        assert_eq!(
            list_at(&raw, &["traits", "value"]),
            vec!["evil", "dragon", "3", "fire"]
        );
    }

    #[test]
    fn entries_keep_document_order() {
        let raw = json!({"slots": {"slot2": 1, "slot0": 2, "slot1": 3}});
        let keys: Vec<&str> = entries_at(&raw, &["slots"]).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["slot2", "slot0", "slot1"]);
    }
}
