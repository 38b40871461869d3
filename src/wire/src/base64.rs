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

//! Encode and decode `bytes` fields.
//!
//! Google Cloud REST APIs send binary payloads as base64 strings, using the
//! standard alphabet from [RFC 4648] and `=` padding. The decoder only accepts
//! that canonical form: any other alphabet, missing or misplaced padding, or
//! non-zero bits in the final character are rejected.
//!
//! # Example
//! ```
//! # use google_cloud_wire::base64;
//! assert_eq!(base64::encode(b"Man"), "TWFu");
//! assert_eq!(base64::decode("TWFu")?, b"Man");
//! # Ok::<(), base64::DecodeError>(())
//! ```
//!
//! [RFC 4648]: https://datatracker.ietf.org/doc/html/rfc4648#section-4

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';

// Marks bytes outside the alphabet in `DECODE_TABLE`.
const INVALID: u8 = 0xFF;

const DECODE_TABLE: [u8; 256] = decode_table();

const fn decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Represents failures decoding base64 text.
///
/// # Example
/// ```
/// # use google_cloud_wire::base64::{decode, DecodeError};
/// let err = decode("not-valid-base64!!").unwrap_err();
/// assert!(matches!(err, DecodeError::InvalidLength(18)));
///
/// let err = decode("TW-u").unwrap_err();
/// assert!(matches!(err, DecodeError::InvalidByte { offset: 2, byte: b'-' }));
/// ```
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input length is not a multiple of 4.
    #[error("the base64 input length ({0}) is not a multiple of 4")]
    InvalidLength(usize),

    /// The input contains a byte outside the standard alphabet.
    #[error("invalid base64 byte {byte:#04x} at offset {offset}")]
    InvalidByte { offset: usize, byte: u8 },

    /// A padding character appears before the end of the input, or there are
    /// more than two of them.
    #[error("misplaced base64 padding at offset {offset}")]
    InvalidPadding { offset: usize },

    /// The last character before the padding has bits set that do not map to
    /// any output byte. Such inputs are not the encoding of any byte sequence.
    #[error("the base64 input has non-zero trailing bits")]
    TrailingBits,
}

/// The length of the base64 encoding for `len` input bytes.
///
/// Always a multiple of 4, as the encoding is padded.
pub fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Encodes `input` using the standard alphabet with padding.
///
/// # Example
/// ```
/// # use google_cloud_wire::base64::encode;
/// assert_eq!(encode([0xFF_u8]), "/w==");
/// assert_eq!(encode(b"Ma"), "TWE=");
/// assert_eq!(encode(b""), "");
/// ```
pub fn encode<T: AsRef<[u8]>>(input: T) -> String {
    let input = input.as_ref();
    let mut output = String::with_capacity(encoded_len(input.len()));
    let mut groups = input.chunks_exact(3);
    for g in &mut groups {
        let n = (g[0] as u32) << 16 | (g[1] as u32) << 8 | g[2] as u32;
        push_sextets(&mut output, n, 4);
    }
    match groups.remainder() {
        &[a] => {
            push_sextets(&mut output, (a as u32) << 16, 2);
            output.push_str("==");
        }
        &[a, b] => {
            push_sextets(&mut output, (a as u32) << 16 | (b as u32) << 8, 3);
            output.push('=');
        }
        _ => {}
    }
    output
}

// Appends the top `count` 6-bit groups of the 24-bit value `n`.
fn push_sextets(output: &mut String, n: u32, count: usize) {
    for i in 0..count {
        let index = (n >> (18 - 6 * i)) & 0x3F;
        output.push(ALPHABET[index as usize] as char);
    }
}

/// Decodes base64 text in the standard alphabet, with padding.
///
/// # Example
/// ```
/// # use google_cloud_wire::base64::{decode, DecodeError};
/// assert_eq!(decode("/w==")?, vec![0xFF_u8]);
/// assert!(decode("/w").is_err());
/// # Ok::<(), DecodeError>(())
/// ```
pub fn decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    if input.len() % 4 != 0 {
        return Err(DecodeError::InvalidLength(input.len()));
    }
    let count = input.len() / 4;
    let mut output = Vec::with_capacity(count * 3);
    for (g, group) in input.chunks_exact(4).enumerate() {
        let start = g * 4;
        let padding = group.iter().rev().take_while(|b| **b == PAD).count();
        if padding > 2 || (padding != 0 && g + 1 != count) {
            return Err(DecodeError::InvalidPadding {
                offset: start + 4 - padding,
            });
        }
        let mut n = 0_u32;
        for (i, byte) in group[..4 - padding].iter().enumerate() {
            let offset = start + i;
            let sextet = match DECODE_TABLE[*byte as usize] {
                _ if *byte == PAD => return Err(DecodeError::InvalidPadding { offset }),
                INVALID => return Err(DecodeError::InvalidByte { offset, byte: *byte }),
                s => s,
            };
            n |= (sextet as u32) << (18 - 6 * i);
        }
        let [_, b0, b1, b2] = n.to_be_bytes();
        match padding {
            0 => output.extend_from_slice(&[b0, b1, b2]),
            1 if b2 == 0 => output.extend_from_slice(&[b0, b1]),
            2 if b1 == 0 && b2 == 0 => output.push(b0),
            _ => return Err(DecodeError::TrailingBits),
        }
    }
    Ok(output)
}
