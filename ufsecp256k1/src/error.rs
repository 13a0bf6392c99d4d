//! Error types.

/// Result type with the `ufsecp256k1` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by the engine.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// value is outside the allowed range
    OutOfRange,
    /// point is not on the curve or is the point at infinity
    InvalidPoint,
    /// private key is zero or not below the group order
    InvalidPrivateKey,
    /// signature is malformed or has a component out of range
    InvalidSignature,
    /// decoding failed: {0}
    Decode(DecodeError),
    /// internal arithmetic check failed
    InternalArithmetic,
}

impl std::error::Error for Error {}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

/// Reasons a byte encoding could not be parsed.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// expected {expected} bytes, got {actual}
    Length {
        /// Required input length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// unexpected tag byte {0}
    Tag(u8),
    /// malformed DER signature
    Der,
}

impl std::error::Error for DecodeError {}
