//! Key handling and encoding tests.

use hex_literal::hex;
use proptest::prelude::*;
use ufsecp256k1::{codec, DecodeError, Error, KeyPair, PublicKey, Scalar, SecretKey};

prop_compose! {
    fn secret_key()(bytes in any::<[u8; 32]>()) -> SecretKey {
        SecretKey::from_bytes(&bytes).unwrap_or_else(|_| SecretKey::from_bytes(&[3u8; 32]).unwrap())
    }
}

prop_compose! {
    fn tweak()(bytes in any::<[u8; 32]>()) -> Scalar {
        Scalar::from_bytes_reduced(&bytes)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tweak_add_is_consistent(secret in secret_key(), tweak in tweak()) {
        let public = secret.public_key().unwrap();
        match secret.tweak_add(&tweak) {
            Ok(tweaked) => prop_assert_eq!(
                tweaked.public_key().unwrap(),
                public.tweak_add(&tweak).unwrap()
            ),
            Err(err) => prop_assert_eq!(err, Error::InvalidPrivateKey),
        }
    }

    #[test]
    fn tweak_mul_is_consistent(secret in secret_key(), tweak in tweak()) {
        prop_assume!(!bool::from(tweak.is_zero()));
        let public = secret.public_key().unwrap();
        let tweaked = secret.tweak_mul(&tweak).unwrap();
        prop_assert_eq!(tweaked.public_key().unwrap(), public.tweak_mul(&tweak).unwrap());
    }

    #[test]
    fn sec1_round_trips(secret in secret_key()) {
        let public = secret.public_key().unwrap();
        prop_assert_eq!(PublicKey::from_sec1_bytes(&public.to_compressed()).unwrap(), public);
        prop_assert_eq!(PublicKey::from_sec1_bytes(&public.to_uncompressed()).unwrap(), public);
    }

    #[test]
    fn negated_key_has_negated_point(secret in secret_key()) {
        let public = secret.public_key().unwrap();
        let negated = secret.negate().public_key().unwrap();
        prop_assert_eq!(*negated.as_affine(), -*public.as_affine());
        prop_assert_eq!(negated.to_x_only(), public.to_x_only());
    }
}

#[test]
fn rejects_bad_secret_keys() {
    let n = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");
    assert_eq!(SecretKey::from_bytes(&[0u8; 32]), Err(Error::InvalidPrivateKey));
    assert_eq!(SecretKey::from_bytes(&n), Err(Error::InvalidPrivateKey));
    assert_eq!(
        SecretKey::from_bytes(&[1u8; 31]),
        Err(Error::Decode(DecodeError::Length {
            expected: 32,
            actual: 31
        }))
    );

    let secret = SecretKey::from_bytes(&[1u8; 32]).unwrap();
    assert_eq!(secret.tweak_mul(&Scalar::ZERO), Err(Error::InvalidPrivateKey));
    assert_eq!(
        secret.tweak_add(&-*secret.as_scalar()),
        Err(Error::InvalidPrivateKey)
    );
    assert_eq!(format!("{secret:?}"), "SecretKey { .. }");
}

#[test]
fn key_pair() {
    let pair = KeyPair::from_bytes(&[0x11; 32]).unwrap();
    assert_eq!(
        pair.public_key(),
        &pair.secret_key().public_key().unwrap()
    );
    assert!(KeyPair::from_bytes(&[0u8; 32]).is_err());

    let random = KeyPair::random(&mut rand_core::OsRng).unwrap();
    assert_ne!(random.public_key(), pair.public_key());
}

#[test]
fn codec_errors() {
    let g = codec::encode_compressed(&ufsecp256k1::AffinePoint::GENERATOR).unwrap();

    let mut bad_tag = g;
    bad_tag[0] = 0x05;
    assert_eq!(
        codec::decode_compressed(&bad_tag),
        Err(Error::Decode(DecodeError::Tag(0x05)))
    );
    assert_eq!(
        codec::decode_point(&g[..32]),
        Err(Error::Decode(DecodeError::Length {
            expected: 33,
            actual: 32
        }))
    );

    let p = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
    let mut x_too_big = [0x02; 33];
    x_too_big[1..].copy_from_slice(&p);
    assert_eq!(codec::decode_compressed(&x_too_big), Err(Error::OutOfRange));
    assert_eq!(codec::decode_field_element(&p), Err(Error::OutOfRange));

    assert_eq!(codec::decode_compressed(&[0u8; 33]), Err(Error::InvalidPoint));
    assert_eq!(codec::decode_uncompressed(&[0u8; 65]), Err(Error::InvalidPoint));

    let identity = codec::decode_point(&[0x00]).unwrap();
    assert!(bool::from(identity.is_identity()));
    assert_eq!(PublicKey::from_affine(identity), Err(Error::InvalidPoint));

    let mut short_uncompressed = [0u8; 40];
    short_uncompressed[0] = 0x04;
    assert_eq!(
        codec::decode_point(&short_uncompressed),
        Err(Error::Decode(DecodeError::Length {
            expected: 65,
            actual: 40
        }))
    );
}
