//! Recursive null-byte sanitization for remote payloads.
//!
//! The development datastore rejects NUL characters inside text values, so
//! every string in a payload is stripped before persistence when running
//! outside production.

use serde_json::Value as JsonValue;

/// Recursively strip NUL characters (`\u{0000}`) from every string in a JSON
/// value, including strings nested in arrays and objects, and object keys.
pub fn strip_null_bytes(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(strip_str(&s)),
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(strip_null_bytes).collect())
        }
        JsonValue::Object(map) => {
            let mut cleaned = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                cleaned.insert(strip_str(&key), strip_null_bytes(val));
            }
            JsonValue::Object(cleaned)
        }
        other => other,
    }
}

fn strip_str(s: &str) -> String {
    if s.contains('\u{0000}') {
        s.chars().filter(|c| *c != '\u{0000}').collect()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_null_bytes_from_strings() {
        let input = json!({"title": "Hello\u{0000}World"});
        let output = strip_null_bytes(input);
        assert_eq!(output, json!({"title": "HelloWorld"}));
    }

    #[test]
    fn test_strips_recursively_including_arrays() {
        let input = json!({"title": "Hello\u{0000}World", "tags": ["a\u{0000}", "b"]});
        let output = strip_null_bytes(input);
        assert_eq!(output, json!({"title": "HelloWorld", "tags": ["a", "b"]}));
    }

    #[test]
    fn test_strips_nested_objects_at_arbitrary_depth() {
        let input = json!({
            "outer": {
                "inner": [{"deep": "x\u{0000}y"}, {"deeper": {"val": "\u{0000}z"}}]
            }
        });
        let output = strip_null_bytes(input);
        assert_eq!(
            output,
            json!({"outer": {"inner": [{"deep": "xy"}, {"deeper": {"val": "z"}}]}})
        );
    }

    #[test]
    fn test_non_string_values_pass_through() {
        let input = json!({"count": 3, "flag": true, "none": null, "ratio": 1.5});
        assert_eq!(strip_null_bytes(input.clone()), input);
    }
}
