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

//! Serialize `i64` fields as decimal strings.
//!
//! JSON numbers are IEEE 754 doubles, with 53 bits of mantissa. Google Cloud
//! REST APIs send 64-bit integers as strings to avoid losing precision, and
//! accept either strings or numbers on input.

use serde::de::Unexpected::Other;

/// A [serde_with] adapter for `int64` fields.
///
/// # Example
/// ```
/// # use google_cloud_wire::internal::I64;
/// #[serde_with::serde_as]
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Message {
///     #[serde_as(as = "I64")]
///     size: i64,
/// }
/// let json = serde_json::to_value(Message { size: i64::MAX })?;
/// assert_eq!(json, serde_json::json!({"size": "9223372036854775807"}));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub struct I64;

impl<'de> serde_with::DeserializeAs<'de, i64> for I64 {
    fn deserialize_as<D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(I64Visitor)
    }
}

visitor_64!(I64Visitor, i64, "a 64-bit signed integer");

impl serde_with::SerializeAs<i64> for I64 {
    fn serialize_as<S>(source: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(source)
    }
}
