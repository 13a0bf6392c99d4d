//! Scalar multiplication tests.

use proptest::prelude::*;
use ufsecp256k1::{
    codec, AffinePoint, ConstantTime, ProjectivePoint, Scalar, ScalarMultiplier, SecretKey,
    VarTime,
};

prop_compose! {
    fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
        Scalar::from_bytes_reduced(&bytes)
    }
}

prop_compose! {
    fn point()(k in scalar()) -> AffinePoint {
        VarTime::mul_generator(&k).unwrap()
    }
}

fn config() -> ProptestConfig {
    ProptestConfig::with_cases(64)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn generator_paths_agree(k in scalar()) {
        prop_assert_eq!(
            VarTime::mul_generator(&k).unwrap(),
            ConstantTime::mul_generator(&k).unwrap()
        );
    }

    #[test]
    fn point_paths_agree(k in scalar(), p in point()) {
        prop_assert_eq!(
            VarTime::mul_point(&k, &p).unwrap(),
            ConstantTime::mul_point(&k, &p).unwrap()
        );
    }

    #[test]
    fn multiplication_composes(a in scalar(), b in scalar()) {
        let a_g = ConstantTime::mul_generator(&a).unwrap();
        prop_assert_eq!(
            ConstantTime::mul_point(&b, &a_g).unwrap(),
            VarTime::mul_generator(&(a * b)).unwrap()
        );
    }

    #[test]
    fn matches_reference_public_key(bytes in any::<[u8; 32]>()) {
        prop_assume!(SecretKey::from_bytes(&bytes).is_ok());
        let secret = SecretKey::from_bytes(&bytes).unwrap();

        let reference = k256::ecdsa::SigningKey::from_slice(&bytes).unwrap();
        let expected = reference.verifying_key().to_encoded_point(true);
        prop_assert_eq!(
            &secret.public_key().unwrap().to_compressed()[..],
            expected.as_bytes()
        );
    }

    #[test]
    fn group_laws(p in point(), q in point()) {
        let p = ProjectivePoint::from(p);
        let q = ProjectivePoint::from(q);
        prop_assert_eq!((p + q).to_affine(), (q + p).to_affine());
        prop_assert_eq!((p + ProjectivePoint::IDENTITY).to_affine(), p.to_affine());
        prop_assert!(bool::from((p + (-p)).is_identity()));
        prop_assert_eq!(p.double().to_affine(), (p + p).to_affine());
    }

    #[test]
    fn compression_round_trips(p in point()) {
        prop_assume!(!bool::from(p.is_identity()));
        let compressed = codec::encode_compressed(&p).unwrap();
        let uncompressed = codec::encode_uncompressed(&p).unwrap();
        prop_assert_eq!(codec::decode_compressed(&compressed).unwrap(), p);
        prop_assert_eq!(codec::decode_uncompressed(&uncompressed).unwrap(), p);
    }
}

#[test]
fn key_one_is_generator() {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    let k = codec::decode_scalar(&bytes).unwrap();
    assert_eq!(VarTime::mul_generator(&k).unwrap(), AffinePoint::GENERATOR);
    assert_eq!(ConstantTime::mul_generator(&k).unwrap(), AffinePoint::GENERATOR);
    assert_eq!(
        SecretKey::from_bytes(&bytes).unwrap().public_key().unwrap().as_affine(),
        &AffinePoint::GENERATOR
    );
}
