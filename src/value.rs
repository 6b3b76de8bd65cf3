//! The generic tagged value tree.
//!
//! A [`Value`] is null, a scalar (bool, 64-bit integer, 64-bit float, string,
//! UTC timestamp), a list of values or a string-keyed map of values. Narrower
//! numerics are widened by the `From` conversions so that the tree only ever
//! holds `i64` and `f64`.
//!
//! Values are plain owned data without interior mutability. [`Value::set`]
//! clones the whole tree and edits the clone, so the value it was called on is
//! never touched and the two trees share nothing.

// maps keep their keys sorted
use std::collections::BTreeMap;
// used to print out readable forms of a value
use std::fmt;

// used for timestamps in values
use chrono::{DateTime, Utc};
// used to ingest and emit JSON and YAML trees
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{AldbError, Result};
use crate::path::{Path, Segment};

pub type Map = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int64",
            Value::Float(_) => "float64",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    fn cast_error(&self, expected: &'static str) -> AldbError {
        if self.is_null() {
            AldbError::NullCast
        } else {
            AldbError::WrongType { expected, found: self.kind_name() }
        }
    }

    pub fn cast_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.cast_error("bool")),
        }
    }
    pub fn cast_int64(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(other.cast_error("int64")),
        }
    }
    pub fn cast_float64(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            other => Err(other.cast_error("float64")),
        }
    }
    pub fn cast_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            other => Err(other.cast_error("string")),
        }
    }
    pub fn cast_time(&self) -> Result<DateTime<Utc>> {
        match self {
            Value::Time(t) => Ok(*t),
            other => Err(other.cast_error("time")),
        }
    }
    pub fn cast_list(&self) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items.as_slice()),
            other => Err(other.cast_error("list")),
        }
    }
    pub fn cast_map(&self) -> Result<&Map> {
        match self {
            Value::Map(entries) => Ok(entries),
            other => Err(other.cast_error("map")),
        }
    }

    /// Returns the node at `path`.
    ///
    /// Descends directly instead of scanning the whole tree. On a map every
    /// segment is a key (so `"0"` finds the entry named `"0"`); on a list the
    /// segment must be an index within `0..len`.
    pub fn get(&self, path: &Path) -> Result<&Value> {
        let mut node = self;
        for segment in path.segments() {
            node = child(node, segment).ok_or_else(|| AldbError::PathNotFound(path.clone()))?;
        }
        Ok(node)
    }

    /// Returns a new tree where the node at `path` is `val`.
    ///
    /// Missing containers are created on the way down: a null node becomes a
    /// list when the next segment is an index and a map otherwise. Lists grow,
    /// padded with nulls, until the index is reachable. The empty path
    /// replaces the whole tree.
    pub fn set(&self, path: &Path, val: impl Into<Value>) -> Result<Value> {
        let mut root = self.clone();
        set_in(&mut root, path.segments(), val.into())?;
        debug!(path = %path, "value set");
        Ok(root)
    }

    /// Folds [`Value::set`] over the pairs in order, starting from null.
    pub fn construct<V: Into<Value>>(pairs: impl IntoIterator<Item = (Path, V)>) -> Result<Value> {
        let mut root = Value::Null;
        for (path, val) in pairs {
            set_in(&mut root, path.segments(), val.into())?;
        }
        Ok(root)
    }
}

fn child<'v>(node: &'v Value, segment: &Segment) -> Option<&'v Value> {
    match node {
        Value::Map(entries) => entries.get(segment.as_key()),
        Value::List(items) => {
            let index = usize::try_from(segment.as_index()?).ok()?;
            items.get(index)
        }
        _ => None,
    }
}

fn set_in(node: &mut Value, segments: &[Segment], val: Value) -> Result<()> {
    let Some((head, tail)) = segments.split_first() else {
        *node = val;
        return Ok(());
    };
    if node.is_null() {
        *node = if head.is_index() { Value::List(Vec::new()) } else { Value::Map(Map::new()) };
    }
    match node {
        Value::Map(entries) => set_in(entries.entry(head.as_key().to_string()).or_default(), tail, val),
        Value::List(items) => {
            let index = head
                .as_index()
                .ok_or(AldbError::WrongType { expected: "map", found: "list" })?;
            let slot = usize::try_from(index).map_err(|_| AldbError::InvalidIndex { index })?;
            if items.len() <= slot {
                let len = slot.checked_add(1).ok_or(AldbError::InvalidIndex { index })?;
                items
                    .try_reserve(len - items.len())
                    .map_err(|_| AldbError::InvalidIndex { index })?;
                items.resize(len, Value::Null);
            }
            set_in(&mut items[slot], tail, val)
        }
        other => Err(AldbError::WrongType {
            expected: if head.is_index() { "list" } else { "map" },
            found: other.kind_name(),
        }),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

// ------------- Construction -------------
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}
impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(f64::from(x))
    }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}
impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(opt: Option<V>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = AldbError;
    fn try_from(json: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    return Err(AldbError::UnsupportedType(format!("integer {n} exceeds int64")));
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| AldbError::UnsupportedType(format!("number {n}")))?
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => {
                Value::List(items.into_iter().map(Value::try_from).collect::<Result<_>>()?)
            }
            Json::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = AldbError;
    fn try_from(yaml: serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value as Yaml;
        Ok(match yaml {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    return Err(AldbError::UnsupportedType(format!("integer {n} exceeds int64")));
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| AldbError::UnsupportedType(format!("number {n}")))?
                }
            }
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => {
                Value::List(items.into_iter().map(Value::try_from).collect::<Result<_>>()?)
            }
            Yaml::Mapping(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((yaml_key(k)?, Value::try_from(v)?)))
                    .collect::<Result<_>>()?,
            ),
            Yaml::Tagged(tagged) => {
                return Err(AldbError::UnsupportedType(format!("YAML tag {}", tagged.tag)));
            }
        })
    }
}

// YAML allows any scalar as a key; the tree only has string keys.
fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(AldbError::UnsupportedType(format!("YAML map key {:?}", other))),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Time(t) => serializer.serialize_str(&t.to_rfc3339()),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(entries) => serializer.collect_map(entries),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(json).map_err(D::Error::custom)
    }
}
