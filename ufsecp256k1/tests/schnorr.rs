//! BIP-340 Schnorr tests.

#![cfg(feature = "schnorr")]

use hex_literal::hex;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use proptest::prelude::*;
use ufsecp256k1::{
    schnorr::{self, Signature, XOnlyPublicKey},
    Error, SecretKey,
};

/// Signing vector from the BIP-340 test set.
struct SignVector {
    secret_key: [u8; 32],
    public_key: [u8; 32],
    aux_rand: [u8; 32],
    message: [u8; 32],
    signature: [u8; 64],
}

const SIGN_VECTORS: &[SignVector] = &[
    SignVector {
        secret_key: hex!("0000000000000000000000000000000000000000000000000000000000000003"),
        public_key: hex!("F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9"),
        aux_rand: hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        message: hex!("0000000000000000000000000000000000000000000000000000000000000000"),
        signature: hex!(
            "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA8215"
            "25F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0"
        ),
    },
    SignVector {
        secret_key: hex!("B7E151628AED2A6ABF7158809CF4F3C762E7160F38B4DA56A784D9045190CFEF"),
        public_key: hex!("DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659"),
        aux_rand: hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        message: hex!("243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89"),
        signature: hex!(
            "6896BD60EEAE296DB48A229FF71DFE071BDE413E6D43F917DC8DCF8C78DE3341"
            "8906D11AC976ABCCB20B091292BFF4EA897EFCB639EA871CFA95F6DE339E4B0A"
        ),
    },
];

#[test]
fn bip340_sign_vectors() {
    for vector in SIGN_VECTORS {
        let secret = SecretKey::from_bytes(&vector.secret_key).unwrap();
        let public = XOnlyPublicKey::from_secret_key(&secret).unwrap();
        assert_eq!(public.to_bytes(), vector.public_key);

        let signature = schnorr::sign(&secret, &vector.message, Some(&vector.aux_rand)).unwrap();
        assert_eq!(signature.to_bytes(), vector.signature);

        let parsed = XOnlyPublicKey::from_bytes(&vector.public_key).unwrap();
        assert!(schnorr::verify(&parsed, &vector.message, &signature).unwrap());
    }
}

#[test]
fn bip340_verify_vectors() {
    // Vector 4: R.x has many leading zeros.
    let public =
        XOnlyPublicKey::from_bytes(&hex!("D69C3509BB99E412E68B0FE8544E72837DFA30746D8BE2AA65975F29D22DC7B9"))
            .unwrap();
    let message = hex!("4DF3C3F68FCC83B27E9D42C90431A72499F17875C81A599B566C9889B9696703");
    let signature = Signature::from_bytes(&hex!(
        "00000000000000000000003B78CE563F89A0ED9414F5AA28AD0D96D6795F9C63"
        "76AFB1548AF603B3EB45C9F8207DEE1060CB71C04E80F593060B07D28308D7F4"
    ))
    .unwrap();
    assert!(schnorr::verify(&public, &message, &signature).unwrap());

    // Vector 5: public key not on the curve.
    assert_eq!(
        XOnlyPublicKey::from_bytes(&hex!(
            "EEFDEA4CDB677750A420FEE807EACF21EB9898AE79B9768766E4FAA04A2D4A34"
        )),
        Err(Error::InvalidPoint)
    );

    // Vector 6: R has odd y.
    let public =
        XOnlyPublicKey::from_bytes(&hex!("DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659"))
            .unwrap();
    let message = hex!("243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89");
    let signature = Signature::from_bytes(&hex!(
        "FFF97BD5755EEEA420453A14355235D382F6472F8568A18B2F057A1460297556"
        "3CC27944640AC607CD107AE10923D9EF7A73C643E166BE5EBEAFA34B1AC553E2"
    ))
    .unwrap();
    assert!(!schnorr::verify(&public, &message, &signature).unwrap());

    // Vectors 12 and 13: R.x equal to p, s equal to n.
    assert_eq!(
        Signature::from_bytes(&hex!(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"
            "69E89B4C5564D00349106B8497785DD7D1D713A8AE82B32FA79D5F7FC407D39B"
        )),
        Err(Error::InvalidSignature)
    );
    assert_eq!(
        Signature::from_bytes(&hex!(
            "6CFF5C3BA86C69EA4B7376F31A9BCB4F74C1976089B2D9963DA2E5543E177769"
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
        )),
        Err(Error::InvalidSignature)
    );
}

prop_compose! {
    fn secret_key()(bytes in any::<[u8; 32]>()) -> SecretKey {
        SecretKey::from_bytes(&bytes).unwrap_or_else(|_| SecretKey::from_bytes(&[7u8; 32]).unwrap())
    }
}

proptest! {
    #[test]
    fn reference_verifier_accepts(
        secret in secret_key(),
        message in any::<[u8; 32]>(),
        aux_rand in any::<[u8; 32]>(),
    ) {
        let public = XOnlyPublicKey::from_secret_key(&secret).unwrap();
        let signature = schnorr::sign(&secret, &message, Some(&aux_rand)).unwrap();
        prop_assert!(schnorr::verify(&public, &message, &signature).unwrap());

        let verifying_key = k256::schnorr::VerifyingKey::from_bytes(&public.to_bytes()).unwrap();
        let theirs = k256::schnorr::Signature::try_from(&signature.to_bytes()[..]).unwrap();
        prop_assert!(verifying_key.verify_prehash(&message, &theirs).is_ok());
    }

    #[test]
    fn aux_rand_changes_signature_not_validity(
        secret in secret_key(),
        message in any::<[u8; 32]>(),
        aux_rand in any::<[u8; 32]>(),
    ) {
        let public = XOnlyPublicKey::from_secret_key(&secret).unwrap();
        let plain = schnorr::sign(&secret, &message, None).unwrap();
        let randomized = schnorr::sign(&secret, &message, Some(&aux_rand)).unwrap();

        if aux_rand != [0u8; 32] {
            prop_assert_ne!(plain, randomized);
        }
        prop_assert!(schnorr::verify(&public, &message, &plain).unwrap());
        prop_assert!(schnorr::verify(&public, &message, &randomized).unwrap());
    }
}
