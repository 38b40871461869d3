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

use std::collections::BTreeMap;
use std::sync::Arc;

/// Declares which fields of a record type need conversion.
///
/// Each record type (e.g. a request or response message) has one schema.
/// Fields not listed in the schema are plain JSON values and pass through
/// the codec unchanged.
///
/// # Example
/// ```
/// # use google_cloud_wire::{FieldKind, Schema};
/// // A `Blob` has a `bytes` payload and an `int64` generation.
/// let blob = Schema::new()
///     .set_field("payload", FieldKind::Bytes)
///     .set_field("generation", FieldKind::Int64);
/// // A `ListBlobsResponse` contains a list of blobs.
/// let response = Schema::new()
///     .set_field("blobs", FieldKind::list(FieldKind::record(blob)))
///     .set_field("readTime", FieldKind::Timestamp);
/// assert!(response.get("nextPageToken").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: BTreeMap<String, FieldKind>,
}

impl Schema {
    /// Creates a schema where no field needs conversion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the kind of a field.
    pub fn set_field<K: Into<String>>(mut self, name: K, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// The kind of the field, if it needs conversion.
    pub fn get(&self, name: &str) -> Option<&FieldKind> {
        self.fields.get(name)
    }

    /// Iterates over the declared fields, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldKind)> {
        self.fields.iter()
    }
}

/// The conversion applied to a field.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum FieldKind {
    /// A byte sequence (`format: byte` in discovery documents).
    Bytes,
    /// A signed 64-bit integer (`format: int64`).
    Int64,
    /// An unsigned 64-bit integer (`format: uint64`).
    UInt64,
    /// A point in time (`format: google-datetime` or `date-time`).
    Timestamp,
    /// A nested record with its own schema.
    Record(Arc<Schema>),
    /// A list where every element has the given kind.
    List(Box<FieldKind>),
    /// A JSON object with arbitrary keys, where every value has the given
    /// kind (`additionalProperties` in discovery documents).
    Map(Box<FieldKind>),
}

impl FieldKind {
    /// A nested record field.
    pub fn record<S: Into<Arc<Schema>>>(schema: S) -> Self {
        Self::Record(schema.into())
    }

    /// A list field.
    pub fn list(item: FieldKind) -> Self {
        Self::List(Box::new(item))
    }

    /// A map field.
    pub fn map(value: FieldKind) -> Self {
        Self::Map(Box::new(value))
    }

    /// Describes the expected wire format, used in error messages.
    pub(crate) fn expected(&self) -> &'static str {
        match self {
            Self::Bytes => "a base64 encoded string",
            Self::Int64 => crate::internal::I64Visitor::EXPECTED,
            Self::UInt64 => crate::internal::U64Visitor::EXPECTED,
            Self::Timestamp => crate::timestamp::EXPECTED_INSTANT,
            Self::Record(_) => "a JSON object",
            Self::List(_) => "a JSON array",
            Self::Map(_) => "a JSON object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let nested = Arc::new(Schema::new().set_field("payload", FieldKind::Bytes));
        let schema = Schema::new()
            .set_field("size", FieldKind::Int64)
            .set_field("items", FieldKind::list(FieldKind::record(nested.clone())))
            .set_field("labels", FieldKind::map(FieldKind::UInt64))
            .set_field("size", FieldKind::Timestamp);
        assert_eq!(schema.get("size"), Some(&FieldKind::Timestamp));
        assert_eq!(
            schema.get("items"),
            Some(&FieldKind::List(Box::new(FieldKind::Record(nested))))
        );
        assert_eq!(schema.get("name"), None);
        let names = schema.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["items", "labels", "size"]);
    }

    #[test]
    fn expected() {
        assert_eq!(FieldKind::Int64.expected(), "a 64-bit signed integer");
        assert_eq!(FieldKind::UInt64.expected(), "a 64-bit unsigned integer");
        assert_eq!(FieldKind::Timestamp.expected(), "an RFC 3339 timestamp");
        assert_eq!(FieldKind::list(FieldKind::Bytes).expected(), "a JSON array");
    }
}
