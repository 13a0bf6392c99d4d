//! ECDH tests.

#![cfg(feature = "ecdh")]

use proptest::prelude::*;
use ufsecp256k1::{codec, ecdh, Error, PublicKey, SecretKey};

prop_compose! {
    fn secret_key()(bytes in any::<[u8; 32]>()) -> SecretKey {
        SecretKey::from_bytes(&bytes).unwrap_or_else(|_| SecretKey::from_bytes(&[9u8; 32]).unwrap())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn shared_secret_is_symmetric(a in secret_key(), b in secret_key()) {
        let a_pub = a.public_key().unwrap();
        let b_pub = b.public_key().unwrap();
        let ab = ecdh::diffie_hellman(&a, &b_pub).unwrap();
        let ba = ecdh::diffie_hellman(&b, &a_pub).unwrap();
        prop_assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn matches_reference(a in secret_key(), b in secret_key()) {
        let ours = ecdh::diffie_hellman(&a, &b.public_key().unwrap()).unwrap();

        let their_secret = k256::SecretKey::from_slice(&a.to_bytes()).unwrap();
        let their_public =
            k256::PublicKey::from_sec1_bytes(&b.public_key().unwrap().to_compressed()).unwrap();
        let theirs = k256::ecdh::diffie_hellman(their_secret.to_nonzero_scalar(), their_public.as_affine());
        prop_assert_eq!(&ours.as_bytes()[..], theirs.raw_secret_bytes().as_slice());
    }
}

#[test]
fn rejects_invalid_peers() {
    assert_eq!(
        PublicKey::from_sec1_bytes(&[0u8; 33]),
        Err(Error::InvalidPoint)
    );

    let mut off_curve =
        codec::encode_uncompressed(&ufsecp256k1::AffinePoint::GENERATOR).unwrap();
    off_curve[64] ^= 1;
    assert_eq!(PublicKey::from_sec1_bytes(&off_curve), Err(Error::InvalidPoint));

    // x = 5 has no point on the curve.
    let mut no_point = [0u8; 33];
    no_point[0] = 0x02;
    no_point[32] = 5;
    assert_eq!(PublicKey::from_sec1_bytes(&no_point), Err(Error::InvalidPoint));
}
