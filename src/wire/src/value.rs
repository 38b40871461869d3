// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Timestamp;
use crate::base64;
use std::collections::BTreeMap;

/// A field value in its native representation.
///
/// Requests are built, and responses returned, using this type. Compared to
/// [serde_json::Value] it has dedicated variants for the types JSON cannot
/// represent directly: byte sequences, 64-bit integers and timestamps.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Record, Timestamp, Value};
/// let record = Record::new()
///     .set("name", "projects/p/locations/l/workflows/w")
///     .set("size", Value::Int64(1 << 60))
///     .set("payload", bytes::Bytes::from_static(b"Man"))
///     .set("createTime", Timestamp::default());
/// assert_eq!(record.get("size"), Some(&Value::Int64(1 << 60)));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// An explicit JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A plain JSON number, such as an `int32` or `double` field.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// A byte sequence, base64 encoded on the wire.
    Bytes(bytes::Bytes),
    /// A signed 64-bit integer, a decimal string on the wire.
    Int64(i64),
    /// An unsigned 64-bit integer, a decimal string on the wire.
    UInt64(u64),
    /// A point in time, an RFC 3339 string on the wire.
    Timestamp(Timestamp),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A nested record, or the entries of a map field.
    Record(Record),
}

impl Value {
    /// A short name for the variant, used in error messages.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Int64(_) => "int64",
            Self::UInt64(_) => "uint64",
            Self::Timestamp(_) => "timestamp",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Converts to the wire representation, using the rules for each variant.
    ///
    /// Fields without a schema entry use this conversion.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) => Json::Number(n.clone()),
            Self::String(s) => Json::String(s.clone()),
            Self::Bytes(b) => Json::String(base64::encode(b)),
            Self::Int64(v) => Json::String(crate::format_wide_int(*v)),
            Self::UInt64(v) => Json::String(crate::format_wide_int(*v)),
            Self::Timestamp(t) => Json::String(crate::format_instant(*t)),
            Self::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Self::Record(r) => Json::Object(
                r.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Converts from a wire value, without any field-specific rules.
    ///
    /// Strings remain strings and numbers remain numbers. Use a
    /// [Codec][crate::Codec] to apply a schema.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(*b),
            Json::Number(n) => Self::Number(n.clone()),
            Json::String(s) => Self::String(s.clone()),
            Json::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => Self::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::UInt64(value)
    }
}

impl From<serde_json::Number> for Value {
    fn from(value: serde_json::Number) -> Self {
        Self::Number(value)
    }
}

impl From<bytes::Bytes> for Value {
    fn from(value: bytes::Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value.into())
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

/// A structured record: field names mapped to values.
///
/// Field names are unique and their order is irrelevant. A field that was
/// never set is absent, which is different from a field set to
/// [Value::Null].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a field, replacing any previous value.
    pub fn set<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(name, value);
        self
    }

    /// Sets a field if `value` is `Some`, and removes it otherwise.
    pub fn set_or_clear<K, V>(mut self, name: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let name = name.into();
        match value {
            Some(v) => {
                self.insert(name, v);
            }
            None => {
                self.remove(&name);
            }
        }
        self
    }

    /// Inserts a field, returning the previous value if any.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(name.into(), value.into())
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns the value of a field, or `None` if the field is absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the field is present, even if its value is null.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The number of fields present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { fields }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
