//! Fixed-width big-endian encodings of scalars, field elements and points.
//!
//! Point encodings go through [`EncodedPoint`]: `0x04 ‖ x ‖ y` uncompressed, `0x02`/`0x03 ‖ x`
//! compressed with the tag carrying the parity of y, and the single byte `0x00` for the
//! identity. BIP-340 x-only `x` with an implied even y is handled here directly.
//!
//! The fixed-width encoders and decoders have no room for the identity: encoding it fails and
//! all-zero input is rejected as [`Error::InvalidPoint`].

use crate::{
    arithmetic::{AffinePoint, FieldElement, Scalar},
    DecodeError, EncodedPoint, Error, Result,
};
use elliptic_curve::sec1::{Coordinates, FromEncodedPoint, Tag, ToEncodedPoint};

/// Length of an encoded scalar or field element.
pub const SCALAR_SIZE: usize = 32;

/// Length of a SEC1 compressed point.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Length of a SEC1 uncompressed point.
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

/// Length of a BIP-340 x-only point.
pub const X_ONLY_SIZE: usize = 32;

/// Borrows `bytes` as an array of exactly `N` bytes.
pub(crate) fn fixed<const N: usize>(bytes: &[u8]) -> Result<&[u8; N]> {
    bytes.try_into().map_err(|_| {
        Error::Decode(DecodeError::Length {
            expected: N,
            actual: bytes.len(),
        })
    })
}

/// Decodes a scalar in [0, n).
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar> {
    let bytes = fixed::<SCALAR_SIZE>(bytes)?;
    Option::from(Scalar::from_bytes(bytes)).ok_or(Error::OutOfRange)
}

/// Encodes a scalar.
pub fn encode_scalar(scalar: &Scalar) -> [u8; SCALAR_SIZE] {
    scalar.to_bytes()
}

/// Decodes a field element in [0, p).
pub fn decode_field_element(bytes: &[u8]) -> Result<FieldElement> {
    let bytes = fixed::<SCALAR_SIZE>(bytes)?;
    Option::from(FieldElement::from_bytes(bytes)).ok_or(Error::OutOfRange)
}

/// Encodes the canonical value of a field element.
pub fn encode_field_element(element: &FieldElement) -> [u8; SCALAR_SIZE] {
    element.to_bytes()
}

/// Decodes any SEC1 point: compressed, uncompressed, or the one-byte identity.
pub fn decode_point(bytes: &[u8]) -> Result<AffinePoint> {
    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| parse_error(bytes))?;
    point_from_encoded(&encoded)
}

/// Decodes a 33-byte compressed point.
pub fn decode_compressed(bytes: &[u8]) -> Result<AffinePoint> {
    let bytes = fixed::<COMPRESSED_POINT_SIZE>(bytes)?;
    check_tag(bytes[0], true)?;
    decode_point(bytes)
}

/// Decodes a 65-byte uncompressed point.
pub fn decode_uncompressed(bytes: &[u8]) -> Result<AffinePoint> {
    let bytes = fixed::<UNCOMPRESSED_POINT_SIZE>(bytes)?;
    check_tag(bytes[0], false)?;
    decode_point(bytes)
}

/// Decodes a 32-byte x-only point, lifting it to the point with even y.
pub fn decode_x_only(bytes: &[u8]) -> Result<AffinePoint> {
    let x = decode_field_element(bytes)?;
    Option::from(AffinePoint::lift_x(&x)).ok_or(Error::InvalidPoint)
}

/// Encodes a point in SEC1 form. The identity encodes as `0x00`.
pub fn encode_point(point: &AffinePoint, compress: bool) -> EncodedPoint {
    point.to_encoded_point(compress)
}

/// Encodes a point in 33-byte compressed form.
pub fn encode_compressed(point: &AffinePoint) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    fixed_encoding(&point.to_encoded_point(true))
}

/// Encodes a point in 65-byte uncompressed form.
pub fn encode_uncompressed(point: &AffinePoint) -> Result<[u8; UNCOMPRESSED_POINT_SIZE]> {
    fixed_encoding(&point.to_encoded_point(false))
}

/// Encodes the x-coordinate of a point.
pub fn encode_x_only(point: &AffinePoint) -> [u8; X_ONLY_SIZE] {
    if bool::from(point.is_identity()) {
        return [0u8; X_ONLY_SIZE];
    }
    point.x().to_bytes()
}

fn fixed_encoding<const N: usize>(encoded: &EncodedPoint) -> Result<[u8; N]> {
    encoded.as_bytes().try_into().map_err(|_| Error::InvalidPoint)
}

/// Range-checks the coordinates so that values not below p report [`Error::OutOfRange`]
/// rather than a generic curve failure.
fn point_from_encoded(encoded: &EncodedPoint) -> Result<AffinePoint> {
    match encoded.coordinates() {
        Coordinates::Identity => {}
        Coordinates::Compact { .. } => {
            return Err(Error::Decode(DecodeError::Tag(encoded.tag().into())));
        }
        Coordinates::Compressed { x, .. } => {
            decode_field_element(x.as_slice())?;
        }
        Coordinates::Uncompressed { x, y } => {
            decode_field_element(x.as_slice())?;
            decode_field_element(y.as_slice())?;
        }
    }
    Option::from(AffinePoint::from_encoded_point(encoded)).ok_or(Error::InvalidPoint)
}

/// Works out why `bytes` is not a well-formed SEC1 encoding.
fn parse_error(bytes: &[u8]) -> Error {
    let Some(&first) = bytes.first() else {
        return Error::Decode(DecodeError::Length {
            expected: COMPRESSED_POINT_SIZE,
            actual: 0,
        });
    };
    match Tag::from_u8(first) {
        // A zero tag followed by anything is a zero-filled fixed-width buffer.
        Ok(Tag::Identity) => Error::InvalidPoint,
        Ok(Tag::Compact) | Err(_) => Error::Decode(DecodeError::Tag(first)),
        Ok(tag) => Error::Decode(DecodeError::Length {
            expected: tag.message_len(SCALAR_SIZE),
            actual: bytes.len(),
        }),
    }
}

/// Accepts only the tags of the requested fixed-width form.
fn check_tag(byte: u8, compressed: bool) -> Result<()> {
    match Tag::from_u8(byte) {
        Ok(Tag::Identity) => Err(Error::InvalidPoint),
        Ok(tag) if tag != Tag::Compact && tag.is_compressed() == compressed => Ok(()),
        _ => Err(Error::Decode(DecodeError::Tag(byte))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const G_COMPRESSED: [u8; 33] =
        hex!("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
    const G_UNCOMPRESSED: [u8; 65] = hex!(
        "0479BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"
    );

    #[test]
    fn generator_encodings() {
        let g = AffinePoint::GENERATOR;
        assert_eq!(encode_compressed(&g).unwrap(), G_COMPRESSED);
        assert_eq!(encode_uncompressed(&g).unwrap(), G_UNCOMPRESSED);
        assert_eq!(encode_point(&g, true).as_bytes(), &G_COMPRESSED[..]);
        assert_eq!(decode_point(&G_COMPRESSED).unwrap(), g);
        assert_eq!(decode_point(&G_UNCOMPRESSED).unwrap(), g);
        assert_eq!(decode_x_only(&G_COMPRESSED[1..]).unwrap(), g);

        let neg = encode_compressed(&-g).unwrap();
        assert_eq!(neg[0], 0x03);
        assert_eq!(decode_compressed(&neg).unwrap(), -g);
    }

    #[test]
    fn identity_is_a_single_zero_byte() {
        let identity = AffinePoint::IDENTITY;
        assert_eq!(encode_point(&identity, true).as_bytes(), &[0x00]);
        assert_eq!(encode_point(&identity, false).as_bytes(), &[0x00]);
        assert_eq!(decode_point(&[0x00]).unwrap(), identity);
        assert_eq!(encode_compressed(&identity), Err(Error::InvalidPoint));
        assert_eq!(encode_uncompressed(&identity), Err(Error::InvalidPoint));
    }

    #[test]
    fn all_zero_fixed_width_rejected() {
        assert_eq!(decode_point(&[0u8; 33]), Err(Error::InvalidPoint));
        assert_eq!(decode_point(&[0u8; 65]), Err(Error::InvalidPoint));
        assert_eq!(decode_compressed(&[0u8; 33]), Err(Error::InvalidPoint));
        assert_eq!(decode_uncompressed(&[0u8; 65]), Err(Error::InvalidPoint));
    }

    #[test]
    fn length_errors() {
        assert_eq!(
            decode_compressed(&G_COMPRESSED[..32]),
            Err(Error::Decode(DecodeError::Length {
                expected: 33,
                actual: 32
            }))
        );
        assert_eq!(
            decode_scalar(&[1u8; 31]),
            Err(Error::Decode(DecodeError::Length {
                expected: 32,
                actual: 31
            }))
        );
        assert_eq!(
            decode_point(&[]),
            Err(Error::Decode(DecodeError::Length {
                expected: 33,
                actual: 0
            }))
        );
    }

    #[test]
    fn decode_point_length_follows_tag() {
        assert_eq!(
            decode_point(&G_UNCOMPRESSED[..64]),
            Err(Error::Decode(DecodeError::Length {
                expected: 65,
                actual: 64
            }))
        );
        assert_eq!(
            decode_point(&G_COMPRESSED[..32]),
            Err(Error::Decode(DecodeError::Length {
                expected: 33,
                actual: 32
            }))
        );

        // A compressed tag on 65 bytes is measured against the compressed width.
        let mut mixed = G_UNCOMPRESSED;
        mixed[0] = 0x02;
        assert_eq!(
            decode_point(&mixed),
            Err(Error::Decode(DecodeError::Length {
                expected: 33,
                actual: 65
            }))
        );
    }

    #[test]
    fn tag_errors() {
        let mut bad = G_COMPRESSED;
        bad[0] = 0x04;
        assert_eq!(decode_compressed(&bad), Err(Error::Decode(DecodeError::Tag(0x04))));

        let mut bad = G_UNCOMPRESSED;
        bad[0] = 0x06;
        assert_eq!(decode_uncompressed(&bad), Err(Error::Decode(DecodeError::Tag(0x06))));
        assert_eq!(decode_point(&bad), Err(Error::Decode(DecodeError::Tag(0x06))));

        // The compact form is not supported.
        let mut compact = G_COMPRESSED;
        compact[0] = 0x05;
        assert_eq!(decode_point(&compact), Err(Error::Decode(DecodeError::Tag(0x05))));
        assert_eq!(decode_compressed(&compact), Err(Error::Decode(DecodeError::Tag(0x05))));
    }

    #[test]
    fn range_and_curve_errors() {
        let p = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
        assert_eq!(decode_field_element(&p), Err(Error::OutOfRange));
        assert_eq!(decode_x_only(&p), Err(Error::OutOfRange));

        let n = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
        assert_eq!(decode_scalar(&n), Err(Error::OutOfRange));

        // x = 5 is not the x-coordinate of any point.
        let mut x = [0u8; 32];
        x[31] = 5;
        assert_eq!(decode_x_only(&x), Err(Error::InvalidPoint));

        let mut x_over_p = [0u8; 33];
        x_over_p[0] = 0x02;
        x_over_p[1..].copy_from_slice(&p);
        assert_eq!(decode_compressed(&x_over_p), Err(Error::OutOfRange));

        let mut off_curve = G_UNCOMPRESSED;
        off_curve[64] ^= 1;
        assert_eq!(decode_uncompressed(&off_curve), Err(Error::InvalidPoint));
    }
}
