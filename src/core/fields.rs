//! Field containers for structured context
//!
//! This module provides:
//! - `FieldValue`: the value attached to a key
//! - `Fields`: an insertion-ordered key/value container with merge semantics
//! - `Fielder`: anything that can expose its own field set

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Map(Fields),
    Null,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Duration(d) => serde_json::Value::Number(duration_nanos(d).into()),
            FieldValue::Map(map) => map.to_json_value(),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

fn duration_nanos(d: &Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Map(map) => write!(f, "{{{}}}", map.format_fields()),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::UInt(u) => serializer.serialize_u64(*u),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Duration(d) => serializer.serialize_u64(duration_nanos(d)),
            FieldValue::Map(map) => map.serialize(serializer),
            FieldValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => FieldValue::String(s),
            // Sequences have no field representation; keep their JSON text.
            serde_json::Value::Array(items) => {
                FieldValue::String(serde_json::Value::Array(items).to_string())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl From<Fields> for FieldValue {
    fn from(map: Fields) -> Self {
        FieldValue::Map(map)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Insertion-ordered mapping from key to value.
///
/// Keys are unique; inserting an existing key overwrites its value in place.
/// Serialization emits keys in sorted order so encoded records are stable
/// regardless of the order in which fields were attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    fields: IndexMap<String, FieldValue>,
}

impl Fields {
    /// Create a new empty field container
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// A container holding exactly one field
    pub fn singleton<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::new().with_field(key, value)
    }

    /// Add a field to the container
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.insert(key, value);
        self
    }

    /// Add a field to the container (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Copy of `self` with every key of `addition` overlaid, last write wins
    #[must_use]
    pub fn merge(&self, addition: &Fields) -> Fields {
        let mut merged = self.clone();
        merged.extend_from(addition);
        merged
    }

    pub(crate) fn extend_from(&mut self, addition: &Fields) {
        for (key, value) in addition.iter() {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Fields ordered by key
    pub fn sorted(&self) -> Vec<(&String, &FieldValue)> {
        let mut entries: Vec<_> = self.fields.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Format fields as key=value pairs, sorted by key
    pub fn format_fields(&self) -> String {
        self.sorted()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, value) in self.sorted() {
            map.insert(key.clone(), value.to_json_value());
        }
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (key, value) in sorted {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = IndexMap::<String, FieldValue>::deserialize(deserializer)?;
        Ok(Self { fields })
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Anything that can expose its own field set.
///
/// Errors implementing this trait contribute their fields when attached with
/// [`Entry::with_error_fields`](crate::core::Entry::with_error_fields).
pub trait Fielder {
    fn fields(&self) -> Fields;
}

impl Fielder for Fields {
    fn fields(&self) -> Fields {
        self.clone()
    }
}

impl<T: Fielder + ?Sized> Fielder for &T {
    fn fields(&self) -> Fields {
        (**self).fields()
    }
}

impl<V: Into<FieldValue> + Clone> Fielder for HashMap<String, V> {
    fn fields(&self) -> Fields {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<V: Into<FieldValue> + Clone> Fielder for BTreeMap<String, V> {
    fn fields(&self) -> Fields {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<V: Into<FieldValue> + Clone> Fielder for IndexMap<String, V> {
    fn fields(&self) -> Fields {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_creation() {
        let fields = Fields::new();
        assert!(fields.is_empty());

        let fields = Fields::singleton("user", "tj");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("user").and_then(FieldValue::as_str), Some("tj"));
    }

    #[test]
    fn test_insertion_order_and_overwrite() {
        let fields = Fields::new()
            .with_field("b", 1)
            .with_field("a", 2)
            .with_field("b", 3);

        let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(fields.get("b"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let base = Fields::new().with_field("user", "tj").with_field("id", 1);
        let addition = Fields::new().with_field("id", 2).with_field("role", "admin");

        let merged = base.merge(&addition);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("id"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.get("role").and_then(FieldValue::as_str), Some("admin"));
        // the receiver is untouched
        assert_eq!(base.get("id"), Some(&FieldValue::Int(1)));
        assert!(!base.contains_key("role"));
    }

    #[test]
    fn test_format_fields_sorted() {
        let fields = Fields::new().with_field("user", "tj").with_field("id", "123");
        assert_eq!(fields.format_fields(), "id=123 user=tj");
    }

    #[test]
    fn test_serialize_sorted_with_nested_and_duration() {
        let nested = Fields::new().with_field("message", "boom");
        let fields = Fields::new()
            .with_field("user", "tj")
            .with_field("duration", Duration::from_millis(2))
            .with_field("error", nested)
            .with_field("missing", None::<i64>);

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(
            json,
            r#"{"duration":2000000,"error":{"message":"boom"},"missing":null,"user":"tj"}"#
        );
    }

    #[test]
    fn test_deserialize() {
        let fields: Fields =
            serde_json::from_str(r#"{"app":"myapp","port":8080,"debug":true,"meta":{"a":1.5}}"#)
                .unwrap();

        assert_eq!(fields.get("app").and_then(FieldValue::as_str), Some("myapp"));
        assert_eq!(fields.get("port"), Some(&FieldValue::Int(8080)));
        assert_eq!(fields.get("debug"), Some(&FieldValue::Bool(true)));
        let meta = fields.get("meta").and_then(FieldValue::as_map).unwrap();
        assert_eq!(meta.get("a"), Some(&FieldValue::Float(1.5)));
    }

    #[test]
    fn test_fielder_impls() {
        let mut map = HashMap::new();
        map.insert("file".to_string(), "something.png");
        assert_eq!(map.fields().len(), 1);

        let mut tree = BTreeMap::new();
        tree.insert("size".to_string(), 42_i64);
        assert_eq!(tree.fields().get("size"), Some(&FieldValue::Int(42)));

        let fields = Fields::singleton("k", "v");
        assert_eq!((&fields).fields(), fields);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("x").to_string(), "x");
        assert_eq!(FieldValue::from(Duration::from_millis(5)).to_string(), "5ms");
        assert_eq!(
            FieldValue::from(Fields::singleton("a", 1)).to_string(),
            "{a=1}"
        );
    }
}
