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

use crate::error::{FieldPath, MalformedFieldError};
use crate::internal::{I64Visitor, U64Visitor};
use serde::de::Visitor;
use serde::de::value::Error as ValueError;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
}

/// The integer types sent as decimal strings: `i64` and `u64`.
///
/// This trait is sealed, it cannot be implemented outside this crate.
pub trait WideInt: sealed::Sealed + std::fmt::Display + Copy {}

impl WideInt for i64 {}
impl WideInt for u64 {}

/// Formats a wide integer as its decimal wire representation.
///
/// # Example
/// ```
/// # use google_cloud_wire::format_wide_int;
/// assert_eq!(format_wide_int(i64::MAX), "9223372036854775807");
/// assert_eq!(format_wide_int(-42_i64), "-42");
/// assert_eq!(format_wide_int(u64::MAX), "18446744073709551615");
/// ```
///
/// Only integers are accepted:
/// ```compile_fail
/// # use google_cloud_wire::format_wide_int;
/// let text = format_wide_int("abc");
/// ```
pub fn format_wide_int<T: WideInt>(value: T) -> String {
    value.to_string()
}

/// Parses the decimal wire representation of an `int64` field.
///
/// Only an optional `-` followed by ASCII digits is accepted. Values outside
/// the `i64` range are rejected, never rounded or truncated.
///
/// # Example
/// ```
/// # use google_cloud_wire::parse_wide_int;
/// assert_eq!(parse_wide_int("9223372036854775807")?, i64::MAX);
/// assert!(parse_wide_int("12x").is_err());
/// assert!(parse_wide_int("9223372036854775808").is_err());
/// # Ok::<(), google_cloud_wire::MalformedFieldError>(())
/// ```
pub fn parse_wide_int(value: &str) -> Result<i64, MalformedFieldError> {
    I64Visitor
        .visit_str::<ValueError>(value)
        .map_err(|e| MalformedFieldError::new(FieldPath::new(), I64Visitor::EXPECTED, e.to_string()))
}

/// Parses the decimal wire representation of a `uint64` field.
///
/// # Example
/// ```
/// # use google_cloud_wire::parse_wide_uint;
/// assert_eq!(parse_wide_uint("18446744073709551615")?, u64::MAX);
/// assert!(parse_wide_uint("-1").is_err());
/// # Ok::<(), google_cloud_wire::MalformedFieldError>(())
/// ```
pub fn parse_wide_uint(value: &str) -> Result<u64, MalformedFieldError> {
    U64Visitor
        .visit_str::<ValueError>(value)
        .map_err(|e| MalformedFieldError::new(FieldPath::new(), U64Visitor::EXPECTED, e.to_string()))
}
