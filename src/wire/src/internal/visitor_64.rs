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

// Generates a visitor for 64-bit integer fields.
//
// On the wire these fields are decimal strings, but many services also send
// them as JSON numbers. Both forms are accepted here; callers that want to
// reject numbers must check the JSON type before using the visitor.
macro_rules! visitor_64 {
    ($name: ident, $t: ty, $msg: literal) => {
        pub(crate) struct $name;

        impl $name {
            pub(crate) const EXPECTED: &'static str = $msg;
        }

        impl serde::de::Visitor<'_> for $name {
            type Value = $t;

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // Only plain decimal numerals are valid in strings. Parse via
                // `i128` so values just outside the range are reported as
                // such, instead of rounding through `f64`.
                let digits = value.strip_prefix('-').unwrap_or(value);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(E::invalid_value(Other(value), &self));
                }
                let v = value
                    .parse::<i128>()
                    .map_err(|_| E::invalid_value(Other(value), &self))?;
                self.visit_i128(v)
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                <$t>::try_from(value).map_err(|_| self::value_error(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                <$t>::try_from(value).map_err(|_| self::value_error(value))
            }

            fn visit_i128<E>(self, value: i128) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                <$t>::try_from(value).map_err(|_| self::value_error(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // `<$t>::MAX as f64` rounds up to 2^N, which is out of range.
                match value {
                    _ if value.fract() != 0.0 => Err(self::value_error(value)),
                    _ if value < <$t>::MIN as f64 => Err(self::value_error(value)),
                    _ if value >= <$t>::MAX as f64 => Err(self::value_error(value)),
                    // In range with no fractional part, the cast is exact.
                    _ => Ok(value as Self::Value),
                }
            }

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str($msg)
            }
        }

        fn value_error<T, E>(value: T) -> E
        where
            T: std::fmt::Display,
            E: serde::de::Error,
        {
            E::invalid_value(Other(&format!("{value}")), &$msg)
        }
    };
}
