//! Engine start-up: generator table construction and the known-answer self-test.

use crate::{
    arithmetic::{
        mul::{ConstantTime, ScalarMultiplier, VarTime},
        table, AffinePoint, FieldElement, ProjectivePoint, Scalar,
    },
    Error, Result,
};
use elliptic_curve::subtle::ConstantTimeEq;
use std::sync::OnceLock;

static SELFTEST_PASSED: OnceLock<bool> = OnceLock::new();

/// 2G, the expected result of several checks below.
const DOUBLE_G: [u8; 33] = [
    0x02, 0xC6, 0x04, 0x7F, 0x94, 0x41, 0xED, 0x7D, 0x6D, 0x30, 0x45, 0x40, 0x6E, 0x95, 0xC0,
    0x7C, 0xD8, 0x5C, 0x77, 0x8E, 0x4B, 0x8C, 0xEF, 0x3C, 0xA7, 0xAB, 0xAC, 0x09, 0xB9, 0x5C,
    0x70, 0x9E, 0xE5,
];

/// Builds the generator table and runs the self-test.
///
/// Only the first call does any work; later calls return the cached outcome. Calling this is
/// optional, since the table is also built lazily on first use.
pub fn init() -> Result<()> {
    let passed = *SELFTEST_PASSED.get_or_init(|| {
        table::generator_table();
        selftest()
    });

    if passed {
        tracing::debug!("ufsecp256k1 initialized");
        Ok(())
    } else {
        Err(Error::InternalArithmetic)
    }
}

/// Runs fixed known-answer checks over every layer of the engine.
///
/// Every failing check is logged at `error` level. No global state is modified apart from
/// building the generator table if it does not exist yet.
pub fn selftest() -> bool {
    let checks: &[(&str, fn() -> bool)] = &[
        ("field", check_field),
        ("scalar", check_scalar),
        ("point", check_point),
        ("multipliers", check_multipliers),
        #[cfg(feature = "ecdsa")]
        ("ecdsa", check_ecdsa),
        #[cfg(feature = "schnorr")]
        ("schnorr", check_schnorr),
    ];

    let mut passed = true;
    for (name, check) in checks {
        if !check() {
            tracing::error!(check = name, "self-test failed");
            passed = false;
        }
    }
    passed
}

fn check_field() -> bool {
    let a = FieldElement::from_u64(0xDEAD_BEEF);
    let b = FieldElement::ONE.negate();
    let inverse_ok = Option::<FieldElement>::from(a.invert())
        .map(|inv| bool::from((a * inv).ct_eq(&FieldElement::ONE)))
        .unwrap_or(false);
    let sqrt_ok = Option::<FieldElement>::from(a.square().sqrt())
        .map(|root| root == a || root == -a)
        .unwrap_or(false);
    // (p - 1)^2 = 1
    inverse_ok && sqrt_ok && b.square() == FieldElement::ONE && bool::from((a - a).is_zero())
}

fn check_scalar() -> bool {
    let minus_one = -Scalar::ONE;
    let x = Scalar::from_u64(0x1234_5678);
    let inverse_ok = Option::<Scalar>::from(x.invert())
        .map(|inv| bool::from((x * inv).ct_eq(&Scalar::ONE)))
        .unwrap_or(false);
    inverse_ok
        && minus_one * minus_one == Scalar::ONE
        && minus_one + Scalar::ONE == Scalar::ZERO
        && bool::from(minus_one.is_high())
}

fn check_point() -> bool {
    let g = ProjectivePoint::GENERATOR;
    let doubled = crate::codec::encode_compressed(&g.double().to_affine());
    let summed = crate::codec::encode_compressed(&g.add(&g).to_affine());
    doubled == Ok(DOUBLE_G) && summed == Ok(DOUBLE_G) && bool::from(g.sub(&g).is_identity())
}

fn check_multipliers() -> bool {
    let two = Scalar::from_u64(2);
    let g = AffinePoint::GENERATOR;
    let results = [
        VarTime::mul_generator(&two),
        VarTime::mul_point(&two, &g),
        ConstantTime::mul_generator(&two),
        ConstantTime::mul_point(&two, &g),
    ];
    results.iter().all(|result| {
        result
            .as_ref()
            .map(|p| crate::codec::encode_compressed(p) == Ok(DOUBLE_G))
            .unwrap_or(false)
    })
}

#[cfg(feature = "ecdsa")]
fn check_ecdsa() -> bool {
    use crate::{ecdsa, keys::SecretKey};

    let outcome = (|| -> Result<bool> {
        let secret = SecretKey::from_scalar(Scalar::from_u64(0x5E1F_7E57))?;
        let public = secret.public_key()?;
        let prehash = crate::hash::sha256(b"ufsecp256k1 self-test");
        let (signature, recovery_id) = ecdsa::sign_prehash_recoverable(&secret, &prehash)?;
        let recovered = ecdsa::recover_from_prehash(&prehash, &signature, recovery_id)?;
        Ok(ecdsa::verify_prehash(&public, &prehash, &signature)?
            && signature.is_low_s()
            && recovered == public)
    })();
    outcome.unwrap_or(false)
}

#[cfg(feature = "schnorr")]
fn check_schnorr() -> bool {
    use crate::{
        keys::SecretKey,
        schnorr::{self, XOnlyPublicKey},
    };

    // BIP-340 test vector 0.
    const PUBLIC_KEY: [u8; 32] = [
        0xF9, 0x30, 0x8A, 0x01, 0x92, 0x58, 0xC3, 0x10, 0x49, 0x34, 0x4F, 0x85, 0xF8, 0x9D,
        0x52, 0x29, 0xB5, 0x31, 0xC8, 0x45, 0x83, 0x6F, 0x99, 0xB0, 0x86, 0x01, 0xF1, 0x13,
        0xBC, 0xE0, 0x36, 0xF9,
    ];
    const SIGNATURE: [u8; 64] = [
        0xE9, 0x07, 0x83, 0x1F, 0x80, 0x84, 0x8D, 0x10, 0x69, 0xA5, 0x37, 0x1B, 0x40, 0x24,
        0x10, 0x36, 0x4B, 0xDF, 0x1C, 0x5F, 0x83, 0x07, 0xB0, 0x08, 0x4C, 0x55, 0xF1, 0xCE,
        0x2D, 0xCA, 0x82, 0x15, 0x25, 0xF6, 0x6A, 0x4A, 0x85, 0xEA, 0x8B, 0x71, 0xE4, 0x82,
        0xA7, 0x4F, 0x38, 0x2D, 0x2C, 0xE5, 0xEB, 0xEE, 0xE8, 0xFD, 0xB2, 0x17, 0x2F, 0x47,
        0x7D, 0xF4, 0x90, 0x0D, 0x31, 0x05, 0x36, 0xC0,
    ];

    let outcome = (|| -> Result<bool> {
        let secret = SecretKey::from_scalar(Scalar::from_u64(3))?;
        let public = XOnlyPublicKey::from_secret_key(&secret)?;
        let msg = [0u8; 32];
        let signature = schnorr::sign(&secret, &msg, Some(&[0u8; 32]))?;
        Ok(public.to_bytes() == PUBLIC_KEY
            && signature.to_bytes() == SIGNATURE
            && schnorr::verify(&public, &msg, &signature)?)
    })();
    outcome.unwrap_or(false)
}
