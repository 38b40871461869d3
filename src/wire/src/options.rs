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

//! Codec configuration.
//!
//! The defaults accept everything Google Cloud services are known to send.
//! Applications validating data from other sources may want to be stricter.

/// Configures how a [Codec][crate::Codec] parses wire values.
///
/// These options only affect [deserialize][crate::Codec::deserialize].
/// Serialization always produces the canonical wire format.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Codec, CodecOptions, FieldKind, Schema};
/// use serde_json::json;
/// let mut options = CodecOptions::default();
/// options.set_accept_numeric_integers(false);
/// let codec = Codec::with_options(options);
///
/// let schema = Schema::new().set_field("size", FieldKind::Int64);
/// assert!(codec.deserialize_value(&json!({"size": 42}), &schema).is_err());
/// assert!(codec.deserialize_value(&json!({"size": "42"}), &schema).is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct CodecOptions {
    accept_numeric_integers: bool,
    accept_timestamp_offsets: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            accept_numeric_integers: true,
            accept_timestamp_offsets: true,
        }
    }
}

impl CodecOptions {
    /// Returns true if 64-bit integer fields accept JSON numbers.
    pub fn accept_numeric_integers(&self) -> bool {
        self.accept_numeric_integers
    }

    /// Accept JSON numbers, as well as strings, in 64-bit integer fields.
    ///
    /// Enabled by default. Numbers must be integral and in range; values
    /// such as `1.5` or `1e300` are always rejected.
    pub fn set_accept_numeric_integers(&mut self, v: bool) {
        self.accept_numeric_integers = v;
    }

    /// Returns true if timestamp fields accept offsets other than `Z`.
    pub fn accept_timestamp_offsets(&self) -> bool {
        self.accept_timestamp_offsets
    }

    /// Accept timestamps with UTC offsets, such as `+02:00`.
    ///
    /// Enabled by default. The parsed value is always normalized to UTC.
    /// When disabled, timestamps must use the `Z` suffix.
    pub fn set_accept_timestamp_offsets(&mut self, v: bool) {
        self.accept_timestamp_offsets = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CodecOptions::default();
        assert!(options.accept_numeric_integers(), "{options:?}");
        assert!(options.accept_timestamp_offsets(), "{options:?}");
    }

    #[test]
    fn setters() {
        let mut options = CodecOptions::default();
        options.set_accept_numeric_integers(false);
        options.set_accept_timestamp_offsets(false);
        assert!(!options.accept_numeric_integers(), "{options:?}");
        assert!(!options.accept_timestamp_offsets(), "{options:?}");
    }
}
