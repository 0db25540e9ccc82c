//! The JSON-like value tree that Chronicle records and compares.
//!
//! [`Value`] is a closed recursive sum type. Besides the plain JSON kinds it
//! carries dates and opaque regular expressions (both compared by value), and
//! an [`Value::Unsupported`] marker for payload fields that cannot be diffed
//! at all.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::path::PropertyPath;

/// Insertion-ordered keyed map.
pub type Map = IndexMap<String, Value>;

/// A JSON-representable value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// A point in time, compared by instant.
    Date(DateTime<Utc>),
    /// A regular expression kept as opaque source text.
    Regex { pattern: String, flags: String },
    Array(Vec<Value>),
    Object(Map),
    /// A payload field with no JSON representation (a callback, a handle).
    /// The string names its type.
    Unsupported(String),
}

impl Value {
    /// Short name of this value's type, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Regex { .. } => "regex",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Unsupported(name) => name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Resolve a property path against this value.
    ///
    /// Segments index into objects by key and into arrays by decimal
    /// position. The root path resolves to `self`.
    pub fn get_path(&self, path: &PropertyPath) -> Option<&Value> {
        self.get_segments(path.segments())
    }

    fn get_segments(&self, segments: &[String]) -> Option<&Value> {
        segments
            .iter()
            .try_fold(self, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            })
    }

    /// Unwrap an object into its map.
    pub fn into_object(self) -> Option<Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Value::Object(Map::new())
    }
}

/// Resolve a non-root property path inside a map.
pub fn lookup<'a>(map: &'a Map, path: &PropertyPath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    map.get(first)?.get_segments(rest)
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Unsupported(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(date) => {
                serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Regex { pattern, flags } => {
                serializer.collect_str(&format_args!("/{pattern}/{flags}"))
            }
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    /// Deserializes plain JSON. Dates and regexes come back as strings.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn from_json_preserves_key_order() {
        let value = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn from_json_nested() {
        let value = Value::from(json!({"arr": [1, "two", null], "obj": {"flag": true}}));
        let map = value.as_object().unwrap();
        assert_eq!(map["arr"].as_array().unwrap().len(), 3);
        assert_eq!(map["obj"].as_object().unwrap()["flag"], Value::Bool(true));
    }

    #[test]
    fn get_path_walks_objects_and_arrays() {
        let value = Value::from(json!({"my": {"identificator": "abcdef"}, "list": [{"x": 1}]}));
        assert_eq!(
            value.get_path(&PropertyPath::parse("my.identificator")),
            Some(&Value::from("abcdef"))
        );
        assert_eq!(
            value.get_path(&PropertyPath::parse("list.0.x")),
            Some(&Value::from(1i64))
        );
        assert!(value.get_path(&PropertyPath::parse("my.missing")).is_none());
        assert!(value.get_path(&PropertyPath::parse("list.7")).is_none());
        assert_eq!(value.get_path(&PropertyPath::root()), Some(&value));
    }

    #[test]
    fn lookup_in_map() {
        let map = Value::from(json!({"my": {"identificator": "abcdef"}}))
            .into_object()
            .unwrap();
        assert_eq!(
            lookup(&map, &PropertyPath::parse("my.identificator")),
            Some(&Value::from("abcdef"))
        );
        assert!(lookup(&map, &PropertyPath::parse("other")).is_none());
        assert!(lookup(&map, &PropertyPath::root()).is_none());
    }

    #[test]
    fn into_object_rejects_non_objects() {
        assert!(Value::from(json!([1])).into_object().is_none());
        assert!(Value::from(json!({})).into_object().is_some());
    }

    #[test]
    fn serializes_dates_and_regexes_as_strings() {
        let date = Utc.with_ymd_and_hms(2016, 6, 15, 12, 0, 0).unwrap();
        let mut map = Map::new();
        map.insert("when".into(), Value::Date(date));
        map.insert(
            "pattern".into(),
            Value::Regex {
                pattern: "^a+$".into(),
                flags: "gi".into(),
            },
        );
        map.insert("callback".into(), Value::Unsupported("function".into()));
        let json = serde_json::to_value(Value::Object(map)).unwrap();
        assert_eq!(
            json,
            json!({
                "when": "2016-06-15T12:00:00.000Z",
                "pattern": "/^a+$/gi",
                "callback": null
            })
        );
    }

    #[test]
    fn deserialize_roundtrips_plain_json() {
        let source = json!({"b": [1, 2.5, "x"], "a": {"c": null}});
        let value: Value = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&value).unwrap(), source);
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert!(Value::from(f64::NAN).is_null());
        assert!(!Value::from(1.5).is_null());
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::empty_object().type_name(), "object");
        assert_eq!(Value::Unsupported("function".into()).type_name(), "function");
    }
}
