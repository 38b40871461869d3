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
use time::format_description::well_known::Rfc3339;

/// A point in time, as used in `google-datetime` fields.
///
/// # Examples
/// ```
/// # use google_cloud_wire::{Timestamp, TimestampError};
/// let ts = Timestamp::try_from("2025-05-16T09:46:12.500Z")?;
/// assert_eq!(ts.seconds(), 1747388772);
/// assert_eq!(ts.nanos(), 500_000_000);
/// assert_eq!(ts.unix_millis(), 1747388772500);
/// # Ok::<(), TimestampError>(())
/// ```
///
/// The value is stored as seconds and nanoseconds since the Unix epoch
/// (1970-01-01T00:00:00Z), independent of any time zone. The nanoseconds are
/// always in `[0, 999_999_999]` and count forward in time, also for instants
/// before the epoch.
///
/// The range is from 0001-01-01T00:00:00Z to 9999-12-31T23:59:59.999999999Z,
/// which is what [RFC 3339] strings can represent with a four digit year.
///
/// # JSON Mapping
///
/// On the wire the value is an RFC 3339 string in UTC, e.g.
/// `"2017-01-15T01:30:15.01Z"`. Fractional seconds are omitted when zero, and
/// otherwise written with trailing zeros removed. Parsing accepts 1 to 9
/// fractional digits and any UTC offset; the result is normalized to UTC.
/// More than 9 fractional digits, and leap seconds (`23:59:60`), are
/// rejected, as they cannot be represented without loss.
///
/// Round trips through the wire format preserve the full nanosecond
/// resolution.
///
/// [RFC 3339]: https://www.ietf.org/rfc/rfc3339.txt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub struct Timestamp {
    // Field order matters for the derived `Ord`.
    seconds: i64,
    nanos: i32,
}

/// Represent failures in converting or creating [Timestamp] instances.
///
/// # Examples
/// ```
/// # use google_cloud_wire::{Timestamp, TimestampError};
/// let ts = Timestamp::new(Timestamp::MAX_SECONDS + 2, 0);
/// assert!(matches!(ts, Err(TimestampError::OutOfRange)));
///
/// let ts = Timestamp::try_from("invalid");
/// assert!(matches!(ts, Err(TimestampError::Deserialize(_))));
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TimestampError {
    /// One of the components (seconds and/or nanoseconds) was out of range.
    #[error("seconds and/or nanoseconds out of range")]
    OutOfRange,

    /// The string is not a valid RFC 3339 timestamp.
    #[error("cannot parse timestamp, source={0}")]
    Deserialize(#[source] BoxedError),
}

type BoxedError = Box<dyn std::error::Error + Send + Sync>;
type Error = TimestampError;

const NS: i128 = 1_000_000_000;

impl Timestamp {
    const NS: i32 = 1_000_000_000;
    const NS_PER_MS: i32 = 1_000_000;

    // Obtained via: `date +%s --date='0001-01-01T00:00:00Z'`
    /// The minimum value for the `seconds` component. Corresponds to '0001-01-01T00:00:00Z'.
    pub const MIN_SECONDS: i64 = -62135596800;

    // Obtained via: `date +%s --date='9999-12-31T23:59:59Z'`
    /// The maximum value for the `seconds` component. Corresponds to '9999-12-31T23:59:59Z'.
    pub const MAX_SECONDS: i64 = 253402300799;

    /// The minimum value for the `nanos` component.
    pub const MIN_NANOS: i32 = 0;

    /// The maximum value for the `nanos` component.
    pub const MAX_NANOS: i32 = Self::NS - 1;

    /// Creates a new [Timestamp] from the seconds and nanoseconds.
    ///
    /// Returns [TimestampError::OutOfRange] if either value is out of range.
    ///
    /// # Examples
    /// ```
    /// # use google_cloud_wire::{Timestamp, TimestampError};
    /// let ts = Timestamp::new(1747388772, 0)?;
    /// assert_eq!(String::from(ts), "2025-05-16T09:46:12Z");
    ///
    /// let ts = Timestamp::new(1747388772, 2_000_000_000);
    /// assert!(matches!(ts, Err(TimestampError::OutOfRange)));
    /// # Ok::<(), TimestampError>(())
    /// ```
    pub fn new(seconds: i64, nanos: i32) -> Result<Self, Error> {
        if !(Self::MIN_SECONDS..=Self::MAX_SECONDS).contains(&seconds) {
            return Err(Error::OutOfRange);
        }
        if !(Self::MIN_NANOS..=Self::MAX_NANOS).contains(&nanos) {
            return Err(Error::OutOfRange);
        }
        Ok(Self { seconds, nanos })
    }

    /// Creates a normalized [Timestamp], saturating at the range limits.
    ///
    /// Nanoseconds outside `[0, 999_999_999]` are carried into the seconds.
    /// Results outside the valid range are clamped to the nearest limit.
    ///
    /// # Examples
    /// ```
    /// # use google_cloud_wire::Timestamp;
    /// let ts = Timestamp::clamp(1747388772, 2_000_000_000);
    /// assert_eq!(String::from(ts), "2025-05-16T09:46:14Z");
    ///
    /// let ts = Timestamp::clamp(i64::MAX, 0);
    /// assert_eq!(ts.seconds(), Timestamp::MAX_SECONDS);
    /// ```
    pub fn clamp(seconds: i64, nanos: i32) -> Self {
        let carry = nanos.div_euclid(Self::NS) as i64;
        let nanos = nanos.rem_euclid(Self::NS);
        match seconds.saturating_add(carry) {
            s if s < Self::MIN_SECONDS => Self {
                seconds: Self::MIN_SECONDS,
                nanos: 0,
            },
            s if s > Self::MAX_SECONDS => Self {
                seconds: Self::MAX_SECONDS,
                nanos: 0,
            },
            seconds => Self { seconds, nanos },
        }
    }

    /// Creates a [Timestamp] from milliseconds since the Unix epoch.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_wire::{Timestamp, TimestampError};
    /// let ts = Timestamp::from_unix_millis(-1)?;
    /// assert_eq!(String::from(ts), "1969-12-31T23:59:59.999Z");
    /// # Ok::<(), TimestampError>(())
    /// ```
    pub fn from_unix_millis(millis: i64) -> Result<Self, Error> {
        let seconds = millis.div_euclid(1000);
        let nanos = millis.rem_euclid(1000) as i32 * Self::NS_PER_MS;
        Self::new(seconds, nanos)
    }

    /// Milliseconds since the Unix epoch, truncating any sub-millisecond part.
    ///
    /// The truncation is towards the past, so the result is the last full
    /// millisecond at or before this instant.
    pub fn unix_millis(&self) -> i64 {
        self.seconds * 1000 + (self.nanos / Self::NS_PER_MS) as i64
    }

    /// Seconds since the Unix epoch (1970-01-01T00:00:00Z).
    ///
    /// # Examples
    /// ```
    /// # use google_cloud_wire::{Timestamp, TimestampError};
    /// let ts = Timestamp::new(120, 500_000_000)?;
    /// assert_eq!(ts.seconds(), 120);
    /// # Ok::<(), TimestampError>(())
    /// ```
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Non-negative fractions of a second at nanosecond resolution.
    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    fn unix_nanos(&self) -> i128 {
        self.seconds as i128 * NS + self.nanos as i128
    }
}

/// Formats an instant as an RFC 3339 string in UTC.
///
/// # Example
/// ```
/// # use google_cloud_wire::{format_instant, Timestamp, TimestampError};
/// let ts = Timestamp::new(12, 345_000_000)?;
/// assert_eq!(format_instant(ts), "1970-01-01T00:00:12.345Z");
/// # Ok::<(), TimestampError>(())
/// ```
pub fn format_instant(timestamp: Timestamp) -> String {
    String::from(timestamp)
}

/// Parses an RFC 3339 string into an instant.
///
/// # Example
/// ```
/// # use google_cloud_wire::{parse_instant, Timestamp};
/// let ts = parse_instant("1970-01-01T01:00:00+01:00")?;
/// assert_eq!(ts, Timestamp::default());
///
/// let err = parse_instant("yesterday").unwrap_err();
/// assert_eq!(err.expected(), "an RFC 3339 timestamp");
/// # Ok::<(), google_cloud_wire::MalformedFieldError>(())
/// ```
pub fn parse_instant(value: &str) -> Result<Timestamp, MalformedFieldError> {
    Timestamp::try_from(value)
        .map_err(|e| MalformedFieldError::new(FieldPath::new(), EXPECTED_INSTANT, e.to_string()))
}

pub(crate) const EXPECTED_INSTANT: &str = "an RFC 3339 timestamp";

const EXPECT_OFFSET_DATE_TIME_CONVERTS: &str = concat!(
    "converting Timestamp to time::OffsetDateTime should always succeed. ",
    "The Timestamp values are always in range. ",
    "If this is not the case, please file a bug at https://github.com/googleapis/google-cloud-rust/issues"
);
const EXPECT_TIMESTAMP_FORMAT_SUCCEEDS: &str = concat!(
    "formatting a Timestamp using RFC-3339 should always succeed. ",
    "The Timestamp values are always in range, and we use a well-known constant for the format specifier. ",
    "If this is not the case, please file a bug at https://github.com/googleapis/google-cloud-rust/issues"
);

/// Converts a [Timestamp] to its RFC 3339 representation.
impl From<Timestamp> for String {
    fn from(timestamp: Timestamp) -> Self {
        let odt = time::OffsetDateTime::from_unix_timestamp_nanos(timestamp.unix_nanos())
            .expect(EXPECT_OFFSET_DATE_TIME_CONVERTS);
        odt.format(&Rfc3339).expect(EXPECT_TIMESTAMP_FORMAT_SUCCEEDS)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from(*self))
    }
}

/// Parses an RFC 3339 string into a [Timestamp].
impl TryFrom<&str> for Timestamp {
    type Error = TimestampError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        check_lossless(value)?;
        let odt = time::OffsetDateTime::parse(value, &Rfc3339)
            .map_err(|e| TimestampError::Deserialize(e.into()))?;
        let nanos = odt.unix_timestamp_nanos();
        Timestamp::new(
            nanos.div_euclid(NS) as i64,
            nanos.rem_euclid(NS) as i32,
        )
    }
}

// `time` truncates fractional digits past the 9th and maps leap seconds to
// `23:59:59.999999999`.
fn check_lossless(value: &str) -> Result<(), TimestampError> {
    let Some((_, time_of_day)) = value.split_once(['T', 't']) else {
        return Ok(());
    };
    if time_of_day.get(6..8) == Some("60") {
        return Err(TimestampError::Deserialize(
            format!("leap seconds are not supported in {value:?}").into(),
        ));
    }
    if let Some((_, fraction)) = time_of_day.split_once('.') {
        let digits = fraction.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 9 {
            return Err(TimestampError::Deserialize(
                format!("more than 9 fractional digits in {value:?}").into(),
            ));
        }
    }
    Ok(())
}

impl TryFrom<&String> for Timestamp {
    type Error = TimestampError;
    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Timestamp::try_from(value.as_str())
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::try_from(s)
    }
}

impl serde::ser::Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&String::from(*self))
    }
}

struct TimestampVisitor;

impl serde::de::Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string with a timestamp in RFC 3339 format")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Timestamp::try_from(value).map_err(E::custom)
    }
}

impl<'de> serde::de::Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

/// Converts from [time::OffsetDateTime] to [Timestamp].
///
/// Fails if the value is outside the [Timestamp] range.
///
/// # Example
/// ```
/// # use google_cloud_wire::Timestamp;
/// use time::macros::datetime;
/// let ts = Timestamp::try_from(datetime!(2025-05-16 09:46:12 UTC))?;
/// assert_eq!(String::from(ts), "2025-05-16T09:46:12Z");
/// # Ok::<(), anyhow::Error>(())
/// ```
impl TryFrom<time::OffsetDateTime> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: time::OffsetDateTime) -> Result<Self, Self::Error> {
        let nanos = value.unix_timestamp_nanos();
        Self::new(nanos.div_euclid(NS) as i64, nanos.rem_euclid(NS) as i32)
    }
}

/// Converts from [Timestamp] to [time::OffsetDateTime] in UTC.
impl From<Timestamp> for time::OffsetDateTime {
    fn from(value: Timestamp) -> Self {
        time::OffsetDateTime::from_unix_timestamp_nanos(value.unix_nanos())
            .expect(EXPECT_OFFSET_DATE_TIME_CONVERTS)
    }
}

/// Converts from [chrono::DateTime] to [Timestamp].
///
/// Fails if the value is outside the [Timestamp] range, or is a leap second.
#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
impl TryFrom<chrono::DateTime<chrono::Utc>> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: chrono::DateTime<chrono::Utc>) -> Result<Self, Self::Error> {
        // chrono represents leap seconds with nanos >= 1_000_000_000, these
        // are out of range for a `Timestamp` and rejected.
        Timestamp::new(
            value.timestamp(),
            value.timestamp_subsec_nanos() as i32,
        )
    }
}

/// Converts from [Timestamp] to [chrono::DateTime].
#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
impl TryFrom<Timestamp> for chrono::DateTime<chrono::Utc> {
    type Error = TimestampError;
    fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
        chrono::DateTime::from_timestamp(value.seconds, value.nanos as u32)
            .ok_or(TimestampError::OutOfRange)
    }
}
