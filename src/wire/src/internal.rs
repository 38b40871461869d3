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

//! Implementation details used by generated message types.
//!
//! These [serde_with] adapters apply the wire rules for `bytes`, `int64` and
//! `uint64` fields to statically typed messages. They share the parsing
//! code with [Codec][crate::Codec], so both paths accept and reject the same
//! inputs.

#[macro_use]
mod visitor_64;

mod bytes;
pub use self::bytes::Base64;
mod int64;
pub use int64::I64;
pub(crate) use int64::I64Visitor;
mod uint64;
pub use uint64::U64;
pub(crate) use uint64::U64Visitor;

// For skipping serialization of default values of bool/numeric types.
pub fn is_default<T>(t: &T) -> bool
where
    T: Default + PartialEq,
{
    *t == T::default()
}
