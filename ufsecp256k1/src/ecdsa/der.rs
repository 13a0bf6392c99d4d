//! ASN.1 DER encoding of ECDSA signatures.
//!
//! ```text
//! ECDSA-Sig-Value ::= SEQUENCE {
//!     r INTEGER,
//!     s INTEGER
//! }
//! ```
//!
//! Decoding is strict: short-form lengths only, minimal non-negative integers, and no
//! trailing data.

use crate::{DecodeError, Error, Result};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Largest encoding: two 33-byte integers plus headers.
pub const MAX_DER_SIZE: usize = 72;

/// Encodes the big-endian integers `r` and `s`.
pub(crate) fn encode(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let r = integer_contents(r);
    let s = integer_contents(s);

    let body_len = 2 + r.len() + 2 + s.len();
    let mut out = Vec::with_capacity(2 + body_len);
    out.push(SEQUENCE_TAG);
    out.push(body_len as u8);
    for int in [&r, &s] {
        out.push(INTEGER_TAG);
        out.push(int.len() as u8);
        out.extend_from_slice(int);
    }
    out
}

/// Minimal two's complement contents of a non-negative integer.
fn integer_contents(bytes: &[u8; 32]) -> Vec<u8> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &bytes[start..];

    let mut out = Vec::with_capacity(33);
    if trimmed[0] & 0x80 != 0 {
        out.push(0);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Decodes `r` and `s` as 32-byte big-endian integers.
pub(crate) fn decode(bytes: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    let body = match bytes {
        [SEQUENCE_TAG, len, body @ ..] if usize::from(*len) == body.len() && *len < 0x80 => body,
        _ => return Err(malformed()),
    };

    let (r, rest) = decode_integer(body)?;
    let (s, rest) = decode_integer(rest)?;
    if !rest.is_empty() {
        return Err(malformed());
    }
    Ok((r, s))
}

fn decode_integer(bytes: &[u8]) -> Result<([u8; 32], &[u8])> {
    let (contents, rest) = match bytes {
        [INTEGER_TAG, len, rest @ ..] if *len < 0x80 && usize::from(*len) <= rest.len() => {
            rest.split_at(usize::from(*len))
        }
        _ => return Err(malformed()),
    };

    let digits = match contents {
        [] => return Err(malformed()),
        // Negative.
        [first, ..] if first & 0x80 != 0 => return Err(malformed()),
        // Non-minimal leading zero.
        [0, second, ..] if second & 0x80 == 0 => return Err(malformed()),
        [0, digits @ ..] if !digits.is_empty() => digits,
        digits => digits,
    };
    if digits.len() > 32 {
        return Err(malformed());
    }

    let mut out = [0u8; 32];
    out[32 - digits.len()..].copy_from_slice(digits);
    Ok((out, rest))
}

fn malformed() -> Error {
    Error::Decode(DecodeError::Der)
}
