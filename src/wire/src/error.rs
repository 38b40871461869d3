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

//! Errors reported while converting records and sending requests.
//!
//! The codec distinguishes between values that do not match their declared
//! format ([MalformedFieldError]) and failures in the HTTP transport
//! ([TransportError]). The latter are reported as-is: the codec never retries
//! or reinterprets them.

use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by [Client][crate::Client] calls.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Error, MalformedFieldError, parse_wide_int};
/// let error = Error::from(parse_wide_int("12x").unwrap_err());
/// assert!(error.is_malformed());
/// assert!(!error.is_transport());
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A field in the request or response could not be converted.
    #[error(transparent)]
    Malformed(#[from] MalformedFieldError),

    /// The transport could not complete the request.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// The error was caused by a field that did not match its declared format.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// The error was reported by the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the conversion error details, if any.
    pub fn as_malformed(&self) -> Option<&MalformedFieldError> {
        match self {
            Self::Malformed(e) => Some(e),
            Self::Transport(_) => None,
        }
    }

    /// Returns the transport error, if any.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

/// A failure reported by the HTTP transport.
///
/// Transports wrap their own error types with [TransportError::new].
/// Applications can recover the original error with
/// [as_inner][TransportError::as_inner].
///
/// # Example
/// ```
/// # use google_cloud_wire::TransportError;
/// let error = TransportError::new(std::io::Error::other("connection reset"));
/// let io = error.as_inner::<std::io::Error>();
/// assert!(io.is_some());
/// ```
#[derive(thiserror::Error, Debug)]
#[error("the transport failed: {0}")]
pub struct TransportError(#[source] BoxError);

impl TransportError {
    /// Creates a new error from the transport's own error type.
    pub fn new<T: Into<BoxError>>(source: T) -> Self {
        Self(source.into())
    }

    /// Returns the original error if it has type `T`.
    pub fn as_inner<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Consumes the error and returns the original error.
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

/// A field whose value does not match its declared format.
///
/// The error identifies the field using its [path][FieldPath] from the top
/// of the record, the expected format, and a description of the problem.
///
/// # Example
/// ```
/// # use google_cloud_wire::{Codec, FieldKind, Schema};
/// use serde_json::json;
/// let schema = Schema::new().set_field("size", FieldKind::Int64);
/// let wire = json!({"size": "12x"});
/// let err = Codec::new().deserialize_value(&wire, &schema).unwrap_err();
/// assert_eq!(err.path().to_string(), "size");
/// ```
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("expected {expected}{}: {reason}", located(.path))]
pub struct MalformedFieldError {
    path: FieldPath,
    expected: &'static str,
    reason: String,
}

fn located(path: &FieldPath) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!(" at `{path}`")
}

impl MalformedFieldError {
    pub(crate) fn new<R: Into<String>>(path: FieldPath, expected: &'static str, reason: R) -> Self {
        Self {
            path,
            expected,
            reason: reason.into(),
        }
    }

    /// The location of the field within the record.
    ///
    /// Errors returned by the standalone parsing functions have an empty path.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// A description of the expected format, e.g. "a 64-bit signed integer".
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// What went wrong.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The location of a field in a (possibly nested) record.
///
/// Displayed as the field names joined by `.`, with list positions as `[n]`
/// and map keys as `["key"]`, for example: `items[2].payload` or
/// `labels["env"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

/// One step in a [FieldPath].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathSegment {
    /// A field in a record.
    Field(String),
    /// A position in a list.
    Index(usize),
    /// A key in a map.
    Key(String),
}

impl FieldPath {
    /// The path for the top-level record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The segments in this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true for the path of the top-level record.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let segments = iter
            .into_iter()
            .map(|s| PathSegment::Field(s.into()))
            .collect();
        Self { segments }
    }
}
