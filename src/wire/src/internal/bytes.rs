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

//! Serialize `bytes` fields as base64 strings.

use crate::base64;

/// A [serde_with] adapter for `bytes` fields.
///
/// Works with any type convertible from a `Vec<u8>` and viewable as a byte
/// slice, such as [bytes::Bytes] or `Vec<u8>`.
///
/// # Example
/// ```
/// # use google_cloud_wire::internal::Base64;
/// #[serde_with::serde_as]
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Message {
///     #[serde_as(as = "Base64")]
///     payload: bytes::Bytes,
/// }
/// let json = serde_json::to_value(Message { payload: bytes::Bytes::from_static(b"Man") })?;
/// assert_eq!(json, serde_json::json!({"payload": "TWFu"}));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub struct Base64;

impl<T> serde_with::SerializeAs<T> for Base64
where
    T: AsRef<[u8]>,
{
    fn serialize_as<S>(source: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&base64::encode(source))
    }
}

impl<'de, T> serde_with::DeserializeAs<'de, T> for Base64
where
    T: From<Vec<u8>>,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_str(Base64Visitor).map(T::from)
    }
}

struct Base64Visitor;

impl serde::de::Visitor<'_> for Base64Visitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a base64 encoded string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        base64::decode(value).map_err(E::custom)
    }
}
