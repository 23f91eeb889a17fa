use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A dynamically typed field value, closed over the shapes JSON can carry.
///
/// Absent fields read as [`FieldValue::Null`], so "missing" and "null" compare
/// equal. Numbers keep their integer/float distinction from the source text:
/// `1` and `1.0` are different values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

static NULL: FieldValue = FieldValue::Null;

impl FieldValue {
    /// Look up a field on an object. Missing fields and non-objects yield `Null`.
    pub fn field(&self, name: &str) -> &FieldValue {
        match self {
            Self::Object(map) => map.get(name).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 beyond i64::MAX and every fractional number
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

/// Field equality: floats within `tolerance` are equal, everything else must
/// match in type and content.
pub fn values_equal(left: &FieldValue, right: &FieldValue, tolerance: f64) -> bool {
    match (left, right) {
        (FieldValue::Float(l), FieldValue::Float(r)) => floats_within(*l, *r, tolerance),
        _ => left == right,
    }
}

/// Slack added to a non-zero tolerance. Covers the representation error of a
/// decimal difference without loosening the bound at large magnitudes.
const BOUNDARY_SLACK: f64 = 1e-9;

/// Absolute-tolerance comparison, inclusive at the boundary.
///
/// `1.01 - 1.0` is `0.010000000000000009` in IEEE-754, so a plain `<=` would
/// reject a human-decimal difference of exactly the tolerance. A zero
/// tolerance means exact equality.
pub fn floats_within(left: f64, right: f64, tolerance: f64) -> bool {
    let delta = (left - right).abs();
    if tolerance == 0.0 {
        return delta == 0.0;
    }
    delta <= tolerance + BOUNDARY_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_number_kinds() {
        assert_eq!(FieldValue::from(json!(1)), FieldValue::Int(1));
        assert_eq!(FieldValue::from(json!(1.0)), FieldValue::Float(1.0));
        assert_eq!(FieldValue::from(json!(-7)), FieldValue::Int(-7));
        assert_eq!(FieldValue::from(json!(u64::MAX)), FieldValue::Float(u64::MAX as f64));
    }

    #[test]
    fn field_lookup_defaults_to_null() {
        let v = FieldValue::from(json!({"name": "Alice", "goal": 1}));
        assert_eq!(v.field("goal"), &FieldValue::Int(1));
        assert_eq!(v.field("missing"), &FieldValue::Null);
        assert_eq!(FieldValue::Int(3).field("goal"), &FieldValue::Null);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        assert!(values_equal(&FieldValue::Float(1.0), &FieldValue::Float(1.01), 0.01));
        assert!(values_equal(&FieldValue::Float(1425.0), &FieldValue::Float(1425.01), 0.01));
        assert!(!values_equal(&FieldValue::Float(1.0), &FieldValue::Float(1.0101), 0.01));
        assert!(!values_equal(&FieldValue::Float(0.0), &FieldValue::Float(-0.0101), 0.01));
    }

    #[test]
    fn tolerance_does_not_grow_with_magnitude() {
        assert!(!values_equal(&FieldValue::Float(1e13), &FieldValue::Float(1e13 + 0.03), 0.01));
        assert!(values_equal(&FieldValue::Float(1e13), &FieldValue::Float(1e13 + 0.01), 0.01));
        assert!(values_equal(&FieldValue::Float(1e6), &FieldValue::Float(1_000_000.01), 0.01));
        assert!(!values_equal(&FieldValue::Float(1e6), &FieldValue::Float(1_000_000.011), 0.01));
    }

    #[test]
    fn tolerance_only_applies_to_float_pairs() {
        assert!(!values_equal(&FieldValue::Int(1), &FieldValue::Float(1.0), 0.01));
        assert!(!values_equal(&FieldValue::Int(1), &FieldValue::Int(2), 5.0));
        assert!(values_equal(&FieldValue::Null, &FieldValue::Null, 0.01));
        assert!(!values_equal(&FieldValue::Null, &FieldValue::Str(String::new()), 0.01));
    }

    #[test]
    fn zero_tolerance_is_exact() {
        assert!(values_equal(&FieldValue::Float(2.5), &FieldValue::Float(2.5), 0.0));
        assert!(!values_equal(&FieldValue::Float(2.5), &FieldValue::Float(2.6), 0.0));
    }

    #[test]
    fn display_is_json_text() {
        assert_eq!(FieldValue::Float(1425.0).to_string(), "1425.0");
        assert_eq!(FieldValue::Str("no".into()).to_string(), "\"no\"");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::from(json!([1, "a"])).to_string(), "[1,\"a\"]");
    }
}
