//! Total accessors over `serde_json::Value`.
//!
//! Upstream numerics arrive as JSON numbers or as decimal strings depending on
//! the endpoint; these helpers accept both and reject NaN and infinities.

use serde_json::Value;

/// Read a finite number from a JSON number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub(crate) fn number_or_zero(value: &Value) -> f64 {
    number(value).unwrap_or(0.0)
}

/// Read a non-negative integer from a JSON number or a decimal string.
pub(crate) fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Stringify scalars; null, arrays and objects have no string form here.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A string field that is present and non-empty.
pub(crate) fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Walk a key path, yielding `None` as soon as a segment is missing.
pub(crate) fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(&json!("100.5")), Some(100.5));
        assert_eq!(number(&json!(" 10 ")), Some(10.0));
        assert_eq!(number(&json!(7)), Some(7.0));
        assert_eq!(number(&json!("abc")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!(null)), None);
        assert_eq!(number(&json!(true)), None);
    }

    #[test]
    fn test_unsigned() {
        assert_eq!(unsigned(&json!(12)), Some(12));
        assert_eq!(unsigned(&json!(12.0)), Some(12));
        assert_eq!(unsigned(&json!(12.5)), None);
        assert_eq!(unsigned(&json!(-1)), None);
        assert_eq!(unsigned(&json!("42")), Some(42));
    }

    #[test]
    fn test_path() {
        let v = json!({ "a": { "b": [1, 2] } });
        assert_eq!(path(&v, &["a", "b"]), Some(&json!([1, 2])));
        assert_eq!(path(&v, &["a", "c"]), None);
        assert_eq!(path(&json!(null), &["a"]), None);
    }
}
