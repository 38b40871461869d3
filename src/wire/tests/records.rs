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

#[cfg(test)]
mod test {
    use google_cloud_wire::{
        Codec, FieldKind, PathSegment, Record, Schema, Timestamp, Value, base64, deserialize,
        serialize,
    };
    use serde_json::{Value as Json, json};
    use std::sync::Arc;
    use test_case::test_case;
    type Result = anyhow::Result<()>;

    // Loosely modeled after the `Object` and `ListObjectsResponse` messages
    // in the Cloud Storage JSON API.
    fn object_schema() -> Arc<Schema> {
        let customer_encryption = Schema::new().set_field("keySha256", FieldKind::Bytes);
        Arc::new(
            Schema::new()
                .set_field("generation", FieldKind::Int64)
                .set_field("metageneration", FieldKind::Int64)
                .set_field("size", FieldKind::UInt64)
                .set_field("md5Hash", FieldKind::Bytes)
                .set_field("timeCreated", FieldKind::Timestamp)
                .set_field("customerEncryption", FieldKind::record(customer_encryption))
                .set_field("checksums", FieldKind::map(FieldKind::Bytes)),
        )
    }

    fn list_schema() -> Schema {
        Schema::new().set_field("items", FieldKind::list(FieldKind::record(object_schema())))
    }

    fn wire_object() -> Json {
        json!({
            "kind": "storage#object",
            "name": "folder/file.txt",
            "generation": "1747388772123456",
            "metageneration": "1",
            "size": "18446744073709551615",
            "md5Hash": "XrY7u+Ae7tCTyyK7j1rNww==",
            "timeCreated": "2025-05-16T09:46:12.123Z",
            "customerEncryption": {
                "encryptionAlgorithm": "AES256",
                "keySha256": "TWFu",
            },
            "checksums": {"crc32c": "/w==", "md5": ""},
            "metadata": {"owner": "test-only", "count": "7"},
        })
    }

    fn native_object() -> anyhow::Result<Record> {
        let record = Record::new()
            .set("kind", "storage#object")
            .set("name", "folder/file.txt")
            .set("generation", 1747388772123456_i64)
            .set("metageneration", 1_i64)
            .set("size", u64::MAX)
            .set("md5Hash", base64::decode("XrY7u+Ae7tCTyyK7j1rNww==")?)
            .set("timeCreated", Timestamp::new(1747388772, 123_000_000)?)
            .set(
                "customerEncryption",
                Record::new()
                    .set("encryptionAlgorithm", "AES256")
                    .set("keySha256", bytes::Bytes::from_static(b"Man")),
            )
            .set(
                "checksums",
                Record::new()
                    .set("crc32c", vec![0xFF_u8])
                    .set("md5", Vec::<u8>::new()),
            )
            .set(
                "metadata",
                Record::new().set("owner", "test-only").set("count", "7"),
            );
        Ok(record)
    }

    #[test]
    fn deserialize_object() -> Result {
        let got = Codec::new().deserialize_value(&wire_object(), &object_schema())?;
        assert_eq!(got, native_object()?);
        Ok(())
    }

    #[test]
    fn serialize_object() -> Result {
        let got = serialize(&native_object()?, &object_schema())?;
        assert_eq!(Json::Object(got), wire_object());
        Ok(())
    }

    #[test]
    fn list_response() -> Result {
        let input = json!({
            "kind": "storage#objects",
            "nextPageToken": "abc123",
            "items": [wire_object(), {"name": "empty"}],
        });
        let got = Codec::new().deserialize_value(&input, &list_schema())?;
        let items = match got.get("items") {
            Some(Value::List(items)) => items,
            other => panic!("expected a list, got {other:?}"),
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Value::Record(native_object()?));
        assert_eq!(items[1], Value::Record(Record::new().set("name", "empty")));

        let rt = serialize(&got, &list_schema())?;
        assert_eq!(Json::Object(rt), input);
        Ok(())
    }

    #[test]
    fn optional_fields_stay_absent() -> Result {
        let input = json!({"name": "partial", "generation": "2"});
        let got = Codec::new().deserialize_value(&input, &object_schema())?;
        assert_eq!(got.len(), 2, "{got:?}");
        for name in ["size", "md5Hash", "timeCreated", "customerEncryption", "checksums"] {
            assert!(!got.contains(name), "{name} in {got:?}");
        }
        let rt = serialize(&got, &object_schema())?;
        assert_eq!(Json::Object(rt), input);
        Ok(())
    }

    #[test_case(json!({"items": [{}, {"generation": "12x"}]}), "items[1].generation")]
    #[test_case(json!({"items": [{"customerEncryption": {"keySha256": "TWF"}}]}), "items[0].customerEncryption.keySha256")]
    #[test_case(json!({"items": [{"checksums": {"crc32c": "AAAA", "md5": "A"}}]}), r#"items[0].checksums["md5"]"#)]
    #[test_case(json!({"items": [{"timeCreated": "2025-05-16"}]}), "items[0].timeCreated")]
    #[test_case(json!({"items": [{"size": "-1"}]}), "items[0].size")]
    fn malformed_path(input: Json, want: &str) {
        let err = Codec::new()
            .deserialize_value(&input, &list_schema())
            .unwrap_err();
        assert_eq!(err.path().to_string(), want, "{err}");
        assert!(err.to_string().contains(&format!("`{want}`")), "{err}");
    }

    #[test]
    fn malformed_path_segments() {
        let input = json!({"items": [{}, {"checksums": {"md5": "!!!!"}}]});
        let err = Codec::new()
            .deserialize_value(&input, &list_schema())
            .unwrap_err();
        assert_eq!(
            err.path().segments(),
            &[
                PathSegment::Field("items".into()),
                PathSegment::Index(1),
                PathSegment::Field("checksums".into()),
                PathSegment::Key("md5".into()),
            ]
        );
        assert_eq!(err.expected(), "a base64 encoded string");
    }

    #[test]
    fn wire_input_is_not_modified() -> Result {
        let input = wire_object();
        let map = match &input {
            Json::Object(m) => m.clone(),
            _ => unreachable!(),
        };
        let _ = deserialize(&map, &object_schema())?;
        assert_eq!(Json::Object(map), input);
        Ok(())
    }

    #[test]
    fn schema_without_fields() -> Result {
        // Without a schema every value keeps its JSON type.
        let got = Codec::new().deserialize_value(&wire_object(), &Schema::new())?;
        assert_eq!(got.get("generation"), Some(&Value::from("1747388772123456")));
        let rt = serialize(&got, &Schema::new())?;
        assert_eq!(Json::Object(rt), wire_object());
        Ok(())
    }
}
