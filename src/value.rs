use serde_json::Value;
use std::fmt;

/// Display adapter for form values as they appear in traces and messages.
///
/// Integral numbers print without a fractional part, strings are quoted and
/// a missing value prints as `null`.
pub struct DisplayValue<'a>(pub &'a Value);

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Number(n) => match n.as_f64() {
                Some(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                    write!(f, "{}", x as i64)
                }
                _ => write!(f, "{}", n),
            },
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other),
        }
    }
}

/// Converts a raw reference cell into a choice label.
///
/// Nulls and composite values yield `None`; scalars are stringified.
pub fn choice_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(DisplayValue(&Value::Number(n.clone())).to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns true when the value counts as an integer (`3` or `3.0`).
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|x| x.fract() == 0.0),
        _ => false,
    }
}

/// JSON equality where numbers compare by value, so `1` equals `1.0`.
pub fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}
