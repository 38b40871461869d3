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

//! Wire format conversions for Google Cloud REST APIs.
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. We welcome feedback about the
//! APIs, documentation, missing features, bugs, etc.
//!
//! Google Cloud REST APIs exchange JSON documents, but some field types have
//! no direct JSON representation:
//!
//! * byte sequences are sent as base64 strings,
//! * 64-bit integers are sent as decimal strings, as they may exceed the
//!   precision of a JSON number,
//! * timestamps are sent as RFC 3339 strings.
//!
//! This crate converts between these wire representations and native Rust
//! types. Typed messages use the [serde_with] adapters in [internal].
//! Dynamic messages use a [Codec], which applies a [Schema] to a [Record]
//! and converts every declared field, recursively.
//!
//! The codec is stateless and synchronous. The only asynchronous boundary is
//! the HTTP [Transport], which [Client] wraps.

pub mod base64;
mod codec;
pub use crate::codec::*;
mod error;
pub use crate::error::*;
mod int64;
pub use crate::int64::*;
#[doc(hidden)]
pub mod internal;
mod options;
pub use crate::options::*;
mod schema;
pub use crate::schema::*;
mod timestamp;
pub use crate::timestamp::*;
mod transport;
pub use crate::transport::*;
mod value;
pub use crate::value::*;
