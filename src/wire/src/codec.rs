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

use crate::base64;
use crate::error::{FieldPath, MalformedFieldError, PathSegment};
use crate::internal::{I64, U64};
use crate::options::CodecOptions;
use crate::schema::{FieldKind, Schema};
use crate::value::{Record, Value};
use crate::{Timestamp, format_instant, format_wide_int};
use serde_json::{Map, Value as Json};
use serde_with::DeserializeAs;

type Result<T> = std::result::Result<T, MalformedFieldError>;

/// Converts records between their native and wire representations.
///
/// The conversion is driven by a [Schema]: only the fields it declares are
/// converted, all other fields are copied as-is. Nested records are converted
/// using their own schema. Fields absent in the input are absent in the
/// output, and the input is never modified.
///
/// Conversions fail on the first malformed field, and the error includes the
/// path to that field.
///
/// A `Codec` holds no state besides its [options][CodecOptions]. It can be
/// shared freely between threads.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Codec, FieldKind, Record, Schema, Value};
/// use serde_json::json;
/// let schema = Schema::new()
///     .set_field("payload", FieldKind::Bytes)
///     .set_field("size", FieldKind::Int64);
/// let record = Record::new()
///     .set("payload", bytes::Bytes::from_static(b"Man"))
///     .set("size", i64::MAX)
///     .set("name", "test-only");
///
/// let codec = Codec::new();
/// let wire = codec.serialize(&record, &schema)?;
/// assert_eq!(
///     json!(wire),
///     json!({"payload": "TWFu", "size": "9223372036854775807", "name": "test-only"})
/// );
/// assert_eq!(codec.deserialize(&wire, &schema)?, record);
/// # Ok::<(), google_cloud_wire::MalformedFieldError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    /// Creates a codec with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom options.
    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    /// The options used by this codec.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Converts a native record to its wire representation.
    ///
    /// Fails if the native value of a declared field does not match its
    /// kind, e.g. a [Value::String] in an [Int64][FieldKind::Int64] field.
    /// [Value::Null] is valid for any kind.
    pub fn serialize(&self, record: &Record, schema: &Schema) -> Result<Map<String, Json>> {
        self.serialize_record(record, schema, &mut FieldPath::new())
    }

    /// Converts a wire object to a native record.
    pub fn deserialize(&self, wire: &Map<String, Json>, schema: &Schema) -> Result<Record> {
        self.deserialize_record(wire, schema, &mut FieldPath::new())
    }

    /// Converts any wire value to a native record.
    ///
    /// Fails unless `wire` is a JSON object.
    pub fn deserialize_value(&self, wire: &Json, schema: &Schema) -> Result<Record> {
        match wire {
            Json::Object(map) => self.deserialize(map, schema),
            other => Err(MalformedFieldError::new(
                FieldPath::new(),
                "a JSON object",
                format!("found {}", json_type_name(other)),
            )),
        }
    }

    fn serialize_record(
        &self,
        record: &Record,
        schema: &Schema,
        path: &mut FieldPath,
    ) -> Result<Map<String, Json>> {
        let mut output = Map::new();
        for (name, value) in record.iter() {
            let wire = match schema.get(name) {
                None => value.to_json(),
                Some(kind) => {
                    path.push(PathSegment::Field(name.clone()));
                    let wire = self.serialize_field(value, kind, path)?;
                    path.pop();
                    wire
                }
            };
            output.insert(name.clone(), wire);
        }
        Ok(output)
    }

    fn serialize_field(&self, value: &Value, kind: &FieldKind, path: &mut FieldPath) -> Result<Json> {
        let wire = match (kind, value) {
            (_, Value::Null) => Json::Null,
            (FieldKind::Bytes, Value::Bytes(b)) => Json::String(base64::encode(b)),
            (FieldKind::Int64, Value::Int64(v)) => Json::String(format_wide_int(*v)),
            (FieldKind::UInt64, Value::UInt64(v)) => Json::String(format_wide_int(*v)),
            (FieldKind::Timestamp, Value::Timestamp(t)) => Json::String(format_instant(*t)),
            (FieldKind::Record(schema), Value::Record(r)) => {
                Json::Object(self.serialize_record(r, schema, path)?)
            }
            (FieldKind::List(item), Value::List(items)) => {
                let mut output = Vec::with_capacity(items.len());
                for (i, v) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    output.push(self.serialize_field(v, item, path)?);
                    path.pop();
                }
                Json::Array(output)
            }
            (FieldKind::Map(item), Value::Record(entries)) => {
                let mut output = Map::new();
                for (key, v) in entries.iter() {
                    path.push(PathSegment::Key(key.clone()));
                    output.insert(key.clone(), self.serialize_field(v, item, path)?);
                    path.pop();
                }
                Json::Object(output)
            }
            (kind, value) => {
                return Err(MalformedFieldError::new(
                    path.clone(),
                    kind.expected(),
                    format!("found a native {} value", value.type_name()),
                ));
            }
        };
        Ok(wire)
    }

    fn deserialize_record(
        &self,
        wire: &Map<String, Json>,
        schema: &Schema,
        path: &mut FieldPath,
    ) -> Result<Record> {
        let mut record = Record::new();
        for (name, json) in wire {
            let value = match schema.get(name) {
                None => Value::from_json(json),
                Some(kind) => {
                    path.push(PathSegment::Field(name.clone()));
                    let value = self.deserialize_field(json, kind, path)?;
                    path.pop();
                    value
                }
            };
            record.insert(name.as_str(), value);
        }
        Ok(record)
    }

    fn deserialize_field(&self, json: &Json, kind: &FieldKind, path: &mut FieldPath) -> Result<Value> {
        let value = match (kind, json) {
            (_, Json::Null) => Value::Null,
            (FieldKind::Bytes, Json::String(s)) => base64::decode(s)
                .map(|b| Value::Bytes(b.into()))
                .map_err(|e| MalformedFieldError::new(path.clone(), kind.expected(), e.to_string()))?,
            (FieldKind::Int64, _) => Value::Int64(self.integer::<I64, i64>(json, kind, path)?),
            (FieldKind::UInt64, _) => Value::UInt64(self.integer::<U64, u64>(json, kind, path)?),
            (FieldKind::Timestamp, Json::String(s)) => Value::Timestamp(self.timestamp(s, kind, path)?),
            (FieldKind::Record(schema), Json::Object(map)) => {
                Value::Record(self.deserialize_record(map, schema, path)?)
            }
            (FieldKind::List(item), Json::Array(items)) => {
                let mut output = Vec::with_capacity(items.len());
                for (i, v) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    output.push(self.deserialize_field(v, item, path)?);
                    path.pop();
                }
                Value::List(output)
            }
            (FieldKind::Map(item), Json::Object(map)) => {
                let mut output = Record::new();
                for (key, v) in map {
                    path.push(PathSegment::Key(key.clone()));
                    output.insert(key.as_str(), self.deserialize_field(v, item, path)?);
                    path.pop();
                }
                Value::Record(output)
            }
            (kind, json) => {
                return Err(MalformedFieldError::new(
                    path.clone(),
                    kind.expected(),
                    format!("found {}", json_type_name(json)),
                ));
            }
        };
        Ok(value)
    }

    fn integer<A, T>(&self, json: &Json, kind: &FieldKind, path: &FieldPath) -> Result<T>
    where
        A: for<'de> DeserializeAs<'de, T>,
    {
        if json.is_number() && !self.options.accept_numeric_integers() {
            return Err(MalformedFieldError::new(
                path.clone(),
                kind.expected(),
                "found a JSON number, but only strings are accepted",
            ));
        }
        A::deserialize_as(json)
            .map_err(|e| MalformedFieldError::new(path.clone(), kind.expected(), e.to_string()))
    }

    fn timestamp(&self, value: &str, kind: &FieldKind, path: &FieldPath) -> Result<Timestamp> {
        if !self.options.accept_timestamp_offsets() && !value.ends_with(['Z', 'z']) {
            return Err(MalformedFieldError::new(
                path.clone(),
                kind.expected(),
                format!("{value:?} does not use the `Z` suffix"),
            ));
        }
        Timestamp::try_from(value)
            .map_err(|e| MalformedFieldError::new(path.clone(), kind.expected(), e.to_string()))
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a JSON boolean",
        Json::Number(_) => "a JSON number",
        Json::String(_) => "a JSON string",
        Json::Array(_) => "a JSON array",
        Json::Object(_) => "a JSON object",
    }
}

/// Converts a native record to its wire representation, using the default
/// options.
///
/// See [Codec::serialize].
pub fn serialize(record: &Record, schema: &Schema) -> Result<Map<String, Json>> {
    Codec::new().serialize(record, schema)
}

/// Converts a wire object to a native record, using the default options.
///
/// See [Codec::deserialize].
pub fn deserialize(wire: &Map<String, Json>, schema: &Schema) -> Result<Record> {
    Codec::new().deserialize(wire, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use test_case::test_case;
    type TestResult = anyhow::Result<()>;

    fn object(value: Json) -> Map<String, Json> {
        match value {
            Json::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn blob_schema() -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .set_field("payload", FieldKind::Bytes)
                .set_field("generation", FieldKind::Int64)
                .set_field("updateTime", FieldKind::Timestamp),
        )
    }

    fn list_schema() -> Schema {
        Schema::new()
            .set_field("blobs", FieldKind::list(FieldKind::record(blob_schema())))
            .set_field("sizes", FieldKind::map(FieldKind::UInt64))
    }

    #[test]
    fn roundtrip_all_kinds() -> TestResult {
        let record = Record::new()
            .set("blobs", vec![
                Value::from(
                    Record::new()
                        .set("payload", bytes::Bytes::from_static(&[0x4D, 0x61, 0x6E]))
                        .set("generation", i64::MAX)
                        .set("updateTime", Timestamp::new(1747388772, 500_000_000)?),
                ),
                Value::from(Record::new().set("payload", bytes::Bytes::from_static(&[0xFF]))),
            ])
            .set("sizes", Record::new().set("a", u64::MAX))
            .set("nextPageToken", "abc");
        let wire = serialize(&record, &list_schema())?;
        let want = json!({
            "blobs": [
                {"payload": "TWFu", "generation": "9223372036854775807", "updateTime": "2025-05-16T09:46:12.5Z"},
                {"payload": "/w=="},
            ],
            "sizes": {"a": "18446744073709551615"},
            "nextPageToken": "abc",
        });
        assert_eq!(Json::Object(wire.clone()), want);
        let got = deserialize(&wire, &list_schema())?;
        assert_eq!(got, record);
        Ok(())
    }

    #[test]
    fn absent_fields_stay_absent() -> TestResult {
        let schema = blob_schema();
        let record = Record::new().set("generation", 7_i64);
        let wire = serialize(&record, &schema)?;
        assert_eq!(Json::Object(wire.clone()), json!({"generation": "7"}));
        let got = deserialize(&wire, &schema)?;
        assert_eq!(got, record);
        assert!(!got.contains("payload"), "{got:?}");
        assert!(!got.contains("updateTime"), "{got:?}");

        let got = deserialize(&Map::new(), &schema)?;
        assert!(got.is_empty(), "{got:?}");
        let wire = serialize(&Record::new(), &schema)?;
        assert!(wire.is_empty(), "{wire:?}");
        Ok(())
    }

    #[test]
    fn null_is_preserved() -> TestResult {
        let schema = blob_schema();
        let wire = object(json!({"payload": null, "generation": null}));
        let got = deserialize(&wire, &schema)?;
        assert_eq!(got, Record::new().set("payload", Value::Null).set("generation", Value::Null));
        let rt = serialize(&got, &schema)?;
        assert_eq!(rt, wire);
        Ok(())
    }

    #[test]
    fn unknown_fields_pass_through() -> TestResult {
        let schema = blob_schema();
        let wire = object(json!({
            "name": "b",
            "count": 3,
            "ratio": 0.5,
            "tags": ["x", "y"],
            "meta": {"generation": "not converted"},
        }));
        let got = deserialize(&wire, &schema)?;
        assert_eq!(got.get("name"), Some(&Value::from("b")));
        assert_eq!(got.get("count"), Some(&Value::Number(3.into())));
        assert_eq!(
            got.get("meta"),
            Some(&Value::from(Record::new().set("generation", "not converted")))
        );
        let rt = serialize(&got, &schema)?;
        assert_eq!(rt, wire);
        Ok(())
    }

    #[test]
    fn input_is_not_modified() -> TestResult {
        let schema = blob_schema();
        let record = Record::new().set("payload", vec![1_u8, 2, 3]);
        let copy = record.clone();
        let _ = serialize(&record, &schema)?;
        assert_eq!(record, copy);

        let wire = object(json!({"payload": "AQID"}));
        let copy = wire.clone();
        let _ = deserialize(&wire, &schema)?;
        assert_eq!(wire, copy);
        Ok(())
    }

    #[test_case(json!({"generation": "12x"}), "generation", "a 64-bit signed integer")]
    #[test_case(json!({"generation": 1.5}), "generation", "a 64-bit signed integer"; "fractional number")]
    #[test_case(json!({"generation": true}), "generation", "a 64-bit signed integer"; "bool")]
    #[test_case(json!({"updateTime": "yesterday"}), "updateTime", "an RFC 3339 timestamp")]
    #[test_case(json!({"updateTime": 0}), "updateTime", "an RFC 3339 timestamp"; "timestamp number")]
    #[test_case(json!({"updateTime": "2025-05-16T09:46:12.1234567891Z"}), "updateTime", "an RFC 3339 timestamp"; "timestamp ten digits")]
    #[test_case(json!({"updateTime": "2016-12-31T23:59:60Z"}), "updateTime", "an RFC 3339 timestamp"; "leap second")]
    #[test_case(json!({"payload": "not-valid-base64!!"}), "payload", "a base64 encoded string")]
    #[test_case(json!({"payload": ["AQID"]}), "payload", "a base64 encoded string"; "bytes array")]
    fn malformed_blob(input: Json, path: &str, expected: &str) {
        let err = deserialize(&object(input), &blob_schema()).unwrap_err();
        assert_eq!(err.path().to_string(), path, "{err:?}");
        assert_eq!(err.expected(), expected, "{err:?}");
    }

    #[test_case(json!({"blobs": [{}, {"generation": "x"}]}), "blobs[1].generation")]
    #[test_case(json!({"blobs": [{"payload": "/w="}]}), "blobs[0].payload")]
    #[test_case(json!({"blobs": {}}), "blobs")]
    #[test_case(json!({"blobs": ["x"]}), "blobs[0]")]
    #[test_case(json!({"sizes": {"a": "1", "b": "-1"}}), r#"sizes["b"]"#)]
    #[test_case(json!({"sizes": []}), "sizes")]
    fn malformed_nested(input: Json, path: &str) {
        let err = deserialize(&object(input), &list_schema()).unwrap_err();
        assert_eq!(err.path().to_string(), path, "{err:?}");
    }

    #[test_case(Record::new().set("generation", "7"), "generation")]
    #[test_case(Record::new().set("generation", 7_u64), "generation"; "unsigned")]
    #[test_case(Record::new().set("payload", "AQID"), "payload")]
    #[test_case(Record::new().set("updateTime", "2025-05-16T09:46:12Z"), "updateTime")]
    fn serialize_mismatch(input: Record, path: &str) {
        let err = serialize(&input, &blob_schema()).unwrap_err();
        assert_eq!(err.path().to_string(), path, "{err:?}");
        assert!(err.reason().contains("native"), "{err:?}");
    }

    #[test]
    fn serialize_nested_mismatch() {
        let input = Record::new().set(
            "blobs",
            vec![Value::from(Record::new()), Value::from(Record::new().set("generation", true))],
        );
        let err = serialize(&input, &list_schema()).unwrap_err();
        assert_eq!(err.path().to_string(), "blobs[1].generation");
    }

    #[test]
    fn fails_on_first_error() {
        let input = object(json!({"generation": "x", "payload": "!"}));
        let err = deserialize(&input, &blob_schema()).unwrap_err();
        // Fields are visited in name order.
        assert_eq!(err.path().to_string(), "generation");
    }

    #[test_case(json!("x"))]
    #[test_case(json!([]))]
    #[test_case(json!(null))]
    fn deserialize_value_not_object(input: Json) {
        let err = Codec::new().deserialize_value(&input, &blob_schema()).unwrap_err();
        assert!(err.path().is_empty(), "{err:?}");
        assert_eq!(err.expected(), "a JSON object");
    }

    #[test]
    fn numeric_integers() -> TestResult {
        let schema = blob_schema();
        let input = json!({"generation": 42});
        let got = Codec::new().deserialize_value(&input, &schema)?;
        assert_eq!(got.get("generation"), Some(&Value::Int64(42)));

        let mut options = CodecOptions::default();
        options.set_accept_numeric_integers(false);
        let err = Codec::with_options(options)
            .deserialize_value(&input, &schema)
            .unwrap_err();
        assert_eq!(err.path().to_string(), "generation");
        Ok(())
    }

    #[test]
    fn timestamp_offsets() -> TestResult {
        let schema = blob_schema();
        let input = json!({"updateTime": "1970-01-01T02:00:00+02:00"});
        let got = Codec::new().deserialize_value(&input, &schema)?;
        assert_eq!(got.get("updateTime"), Some(&Value::Timestamp(Timestamp::default())));

        let mut options = CodecOptions::default();
        options.set_accept_timestamp_offsets(false);
        let codec = Codec::with_options(options);
        assert!(!codec.options().accept_timestamp_offsets());
        let err = codec.deserialize_value(&input, &schema).unwrap_err();
        assert_eq!(err.path().to_string(), "updateTime");
        let got = codec.deserialize_value(&json!({"updateTime": "1970-01-01T00:00:00Z"}), &schema)?;
        assert_eq!(got.get("updateTime"), Some(&Value::Timestamp(Timestamp::default())));
        let input = json!({"updateTime": "2025-05-16T09:46:12.1234567891Z"});
        let err = codec.deserialize_value(&input, &schema).unwrap_err();
        assert_eq!(err.path().to_string(), "updateTime");
        Ok(())
    }

    #[test]
    fn shared_between_threads() -> TestResult {
        let codec = Arc::new(Codec::new());
        let schema = Arc::new(list_schema());
        let handles = (0..4_i64)
            .map(|i| {
                let codec = codec.clone();
                let schema = schema.clone();
                std::thread::spawn(move || {
                    let blob = Record::new().set("generation", i);
                    let record = Record::new().set("blobs", vec![Value::from(blob)]);
                    let wire = codec.serialize(&record, &schema)?;
                    let rt = codec.deserialize(&wire, &schema)?;
                    assert_eq!(rt, record);
                    Ok::<(), MalformedFieldError>(())
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.join().map_err(|_| anyhow::anyhow!("thread panicked"))??;
        }
        Ok(())
    }
}
