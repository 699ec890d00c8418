use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A dynamically-typed value supplied as render context.
///
/// The `Value` enum stands in for whatever schema-less data a caller wants to
/// render against: nested maps and lists of scalars. Lookups into a `Value`
/// never fail; a missing key or out-of-range index resolves to
/// [`Value::Undefined`].
///
/// # Example
///
/// ```
/// use quill::Value;
///
/// // Integers become Value::Number
/// let count: Value = 42.into();
///
/// // Strings become Value::String
/// let name: Value = "Alice".into();
///
/// // JSON documents convert wholesale
/// let user: Value = serde_json::json!({ "name": "Alice", "age": 30 }).into();
/// assert_eq!(user.get("age").and_then(Value::as_number), Some(30));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An explicit null.
    Null,

    /// The result of a failed lookup or an incompatible comparison.
    #[default]
    #[serde(skip_deserializing)]
    Undefined,

    /// A boolean.
    Bool(bool),

    /// An integer number.
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A string value.
    String(String),

    /// An ordered list of values.
    List(Vec<Value>),

    /// A string-keyed map of values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true for the undefined sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Truthiness used by `#if` and the boolean operators.
    ///
    /// `undefined`, `null`, `false`, zero, NaN and the empty string are
    /// falsy. Every list and map is truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Map(_) => true,
        }
    }

    /// Get this value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Number(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up one path segment.
    ///
    /// Maps are indexed by key, lists by a decimal index. Any other
    /// combination yields `None`.
    pub fn get(&self, segment: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(segment),
            Value::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Equality as seen by the `==` operator.
    ///
    /// Integers and floats compare numerically; values of different kinds
    /// are never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Float(b)) | (Value::Float(b), Value::Number(a)) => {
                *a as f64 == *b
            }
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.equals(y)))
            }
            _ => self == other,
        }
    }
}

/// Stringification used for interpolation.
///
/// `undefined` and `null` render as the empty string so that sentinels never
/// leak into output.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined | Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(map) => match serde_json::to_string(map) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str("{}"),
            },
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Number)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            JsonValue::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        for value in [
            Value::Undefined,
            Value::Null,
            Value::Bool(false),
            Value::Number(0),
            Value::Float(0.0),
            Value::Float(f64::NAN),
            Value::from(""),
        ] {
            assert!(!value.is_truthy(), "{value:?} should be falsy");
        }
    }

    #[test]
    fn empty_containers_are_truthy() {
        assert!(Value::List(vec![]).is_truthy());
        assert!(Value::Map(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn get_indexes_lists_by_decimal_segment() {
        let list = Value::from(vec!["a", "b"]);
        assert_eq!(list.get("1"), Some(&Value::from("b")));
        assert_eq!(list.get("2"), None);
        assert_eq!(list.get("first"), None);
    }

    #[test]
    fn scalars_have_no_members() {
        assert_eq!(Value::from(3).get("x"), None);
        assert_eq!(Value::from("abc").get("0"), None);
    }

    #[test]
    fn display_renders_sentinels_empty() {
        assert_eq!(Value::Undefined.to_string(), "");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn display_scalars_and_lists() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-7).to_string(), "-7");
        assert_eq!(Value::from(2.0).to_string(), "2");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1, 2, 3");
    }

    #[test]
    fn display_map_as_json() {
        let value = Value::from(serde_json::json!({ "b": 1, "a": "x" }));
        assert_eq!(value.to_string(), r#"{"a":"x","b":1}"#);
    }

    #[test]
    fn json_numbers_keep_integer_kind() {
        assert_eq!(Value::from(serde_json::json!(19)), Value::Number(19));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn equals_compares_numbers_across_kinds() {
        assert!(Value::Number(2).equals(&Value::Float(2.0)));
        assert!(!Value::Number(2).equals(&Value::from("2")));
        assert!(Value::from(vec![1, 2]).equals(&Value::from(vec![1.0, 2.0])));
    }

    #[test]
    fn deserializes_null_as_null() {
        let value: Value = serde_json::from_str(r#"{"a":null,"b":[1,"x"]}"#).unwrap();
        assert_eq!(value.get("a"), Some(&Value::Null));
        assert_eq!(value.get("b").and_then(|b| b.get("1")), Some(&Value::from("x")));
    }
}
