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

//! Connects the codec to an HTTP transport.
//!
//! The transport is an external collaborator: it sends a JSON body and
//! returns the parsed JSON response. The [Client] converts the request
//! before it is sent and the response after it is received.

use crate::codec::Codec;
use crate::error::{Error, TransportError};
use crate::schema::Schema;
use crate::value::Record;

type Result<T> = std::result::Result<T, Error>;

/// An HTTP transport sending JSON requests.
///
/// Implementations perform the request, parse the response body as JSON,
/// and fail with [TransportError] on network errors or non-2xx responses.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Transport, TransportError};
/// #[derive(Debug)]
/// struct Echo;
/// impl Transport for Echo {
///     async fn request(
///         &self,
///         _url: &str,
///         _method: http::Method,
///         body: Option<serde_json::Value>,
///     ) -> Result<serde_json::Value, TransportError> {
///         Ok(body.unwrap_or_default())
///     }
/// }
/// ```
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Sends a request and returns the parsed JSON response.
    fn request(
        &self,
        url: &str,
        method: http::Method,
        body: Option<serde_json::Value>,
    ) -> impl Future<Output = std::result::Result<serde_json::Value, TransportError>> + Send;
}

/// Sends native records over a [Transport].
///
/// # Example
/// ```
/// # use google_cloud_wire::{Client, FieldKind, Record, Schema, Transport, TransportError};
/// # #[derive(Debug)]
/// # struct Echo;
/// # impl Transport for Echo {
/// #     async fn request(&self, _url: &str, _method: http::Method, body: Option<serde_json::Value>)
/// #         -> Result<serde_json::Value, TransportError> { Ok(body.unwrap_or_default()) }
/// # }
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), google_cloud_wire::Error> {
/// let schema = Schema::new().set_field("generation", FieldKind::Int64);
/// let client = Client::new(Echo);
/// let request = Record::new().set("generation", i64::MAX);
/// let response = client
///     .execute(http::Method::POST, "https://example.com/v1/blobs", Some(&request), &schema, &schema)
///     .await?;
/// assert_eq!(response, request);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct Client<T> {
    transport: T,
    codec: Codec,
}

impl<T: Transport> Client<T> {
    /// Creates a client using the default codec options.
    pub fn new(transport: T) -> Self {
        Self::with_codec(transport, Codec::default())
    }

    /// Creates a client using a custom codec.
    pub fn with_codec(transport: T, codec: Codec) -> Self {
        Self { transport, codec }
    }

    /// The codec used by this client.
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Converts `request`, sends it, and converts the response.
    ///
    /// The request is converted before anything is sent: if it contains a
    /// malformed field the transport is never called. Errors from the
    /// transport are returned unchanged, as [Error::Transport].
    pub async fn execute(
        &self,
        method: http::Method,
        url: &str,
        request: Option<&Record>,
        request_schema: &Schema,
        response_schema: &Schema,
    ) -> Result<Record> {
        let body = request
            .map(|r| self.codec.serialize(r, request_schema))
            .transpose()?
            .map(serde_json::Value::Object);
        tracing::debug!(%method, url, has_body = body.is_some(), "sending request");
        let response = self
            .transport
            .request(url, method, body)
            .await
            .inspect_err(|e| tracing::debug!("transport error: {e}"))?;
        let record = self
            .codec
            .deserialize_value(&response, response_schema)
            .inspect_err(|e| tracing::debug!("cannot convert response: {e}"))?;
        Ok(record)
    }
}
