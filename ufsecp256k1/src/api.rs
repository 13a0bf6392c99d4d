//! Byte-array interface for language bindings.
//!
//! Every function takes and returns the big-endian encodings described in
//! [`codec`](crate::codec). Points are accepted in any SEC1 form, including the one-byte
//! identity `0x00`, and returned compressed unless the name says otherwise. A result that
//! is the identity has no fixed-width encoding and is reported as
//! [`Error::InvalidPoint`](crate::Error::InvalidPoint). Inputs are validated before any
//! arithmetic runs.

use crate::{
    arithmetic::{
        mul::{ConstantTime, ScalarMultiplier, VarTime},
        AffinePoint, ProjectivePoint, Scalar,
    },
    codec::{self, COMPRESSED_POINT_SIZE, SCALAR_SIZE, UNCOMPRESSED_POINT_SIZE},
    keys::SecretKey,
    Result,
};
use elliptic_curve::group::GroupEncoding;

#[cfg(any(feature = "ecdh", feature = "ecdsa"))]
use crate::keys::PublicKey;

/// Length of a message hash.
pub const MESSAGE_HASH_SIZE: usize = 32;

fn scalar_binop(a: &[u8], b: &[u8], op: impl Fn(&Scalar, &Scalar) -> Scalar) -> Result<[u8; 32]> {
    let a = codec::decode_scalar(a)?;
    let b = codec::decode_scalar(b)?;
    Ok(op(&a, &b).to_bytes())
}

/// Returns `a + b mod n`.
pub fn scalar_add(a: &[u8], b: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
    scalar_binop(a, b, Scalar::add)
}

/// Returns `a - b mod n`.
pub fn scalar_sub(a: &[u8], b: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
    scalar_binop(a, b, Scalar::sub)
}

/// Returns `a * b mod n`.
pub fn scalar_mul(a: &[u8], b: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
    scalar_binop(a, b, Scalar::mul)
}

/// Returns `-a mod n`.
pub fn scalar_negate(a: &[u8]) -> Result<[u8; SCALAR_SIZE]> {
    Ok(codec::decode_scalar(a)?.negate().to_bytes())
}

/// Returns the compressed generator.
pub fn generator() -> [u8; COMPRESSED_POINT_SIZE] {
    let mut out = [0u8; COMPRESSED_POINT_SIZE];
    out.copy_from_slice(&AffinePoint::GENERATOR.to_bytes());
    out
}

/// Returns `a + b`.
pub fn point_add(a: &[u8], b: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    let a = ProjectivePoint::from(codec::decode_point(a)?);
    let b = ProjectivePoint::from(codec::decode_point(b)?);
    codec::encode_compressed(&(a + b).to_affine())
}

/// Returns `2 a`.
pub fn point_double(a: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    let a = ProjectivePoint::from(codec::decode_point(a)?);
    codec::encode_compressed(&a.double().to_affine())
}

/// Returns `-a`.
pub fn point_negate(a: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    codec::encode_compressed(&-codec::decode_point(a)?)
}

/// Re-encodes a point in compressed form.
pub fn point_compress(point: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    codec::encode_compressed(&codec::decode_point(point)?)
}

/// Re-encodes a point in uncompressed form.
pub fn point_decompress(point: &[u8]) -> Result<[u8; UNCOMPRESSED_POINT_SIZE]> {
    codec::encode_uncompressed(&codec::decode_point(point)?)
}

/// Is the encoded point the identity?
pub fn point_is_infinity(point: &[u8]) -> Result<bool> {
    Ok(codec::decode_point(point)?.is_identity().into())
}

/// Computes `k G` in variable time. Public scalars only.
pub fn scalar_mul_generator(k: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    mul_generator::<VarTime>(k)
}

/// Computes `k P` in variable time. Public scalars only.
pub fn scalar_mul_point(k: &[u8], point: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    mul_point::<VarTime>(k, point)
}

/// Computes `k G` in constant time.
pub fn ct_scalar_mul_generator(k: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    mul_generator::<ConstantTime>(k)
}

/// Computes `k P` in constant time.
pub fn ct_scalar_mul_point(k: &[u8], point: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    mul_point::<ConstantTime>(k, point)
}

fn mul_generator<M: ScalarMultiplier>(k: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    let k = codec::decode_scalar(k)?;
    codec::encode_compressed(&M::mul_generator(&k)?)
}

fn mul_point<M: ScalarMultiplier>(k: &[u8], point: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    let k = codec::decode_scalar(k)?;
    let point = codec::decode_point(point)?;
    codec::encode_compressed(&M::mul_point(&k, &point)?)
}

/// Is `seckey` a valid secret key?
pub fn ec_seckey_verify(seckey: &[u8]) -> bool {
    SecretKey::from_bytes(seckey).is_ok()
}

/// Derives the compressed public key of `seckey`.
pub fn ec_pubkey_create(seckey: &[u8]) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    Ok(SecretKey::from_bytes(seckey)?.public_key()?.to_compressed())
}

/// Derives the uncompressed public key of `seckey`.
pub fn ec_pubkey_create_uncompressed(seckey: &[u8]) -> Result<[u8; UNCOMPRESSED_POINT_SIZE]> {
    Ok(SecretKey::from_bytes(seckey)?.public_key()?.to_uncompressed())
}

/// Computes the x-coordinate of `seckey * pubkey`.
#[cfg(feature = "ecdh")]
pub fn ecdh(seckey: &[u8], pubkey: &[u8]) -> Result<[u8; 32]> {
    let secret = SecretKey::from_bytes(seckey)?;
    let peer = PublicKey::from_sec1_bytes(pubkey)?;
    Ok(*crate::ecdh::diffie_hellman(&secret, &peer)?.as_bytes())
}

/// Computes SHA-256 of the compressed `seckey * pubkey`.
#[cfg(all(feature = "ecdh", feature = "sha256"))]
pub fn ecdh_sha256(seckey: &[u8], pubkey: &[u8]) -> Result<[u8; 32]> {
    let secret = SecretKey::from_bytes(seckey)?;
    let peer = PublicKey::from_sec1_bytes(pubkey)?;
    Ok(*crate::ecdh::diffie_hellman_sha256(&secret, &peer)?.as_bytes())
}

/// Computes SHA-256 of the x-coordinate of `seckey * pubkey`.
#[cfg(all(feature = "ecdh", feature = "sha256"))]
pub fn ecdh_xonly(seckey: &[u8], pubkey: &[u8]) -> Result<[u8; 32]> {
    let secret = SecretKey::from_bytes(seckey)?;
    let peer = PublicKey::from_sec1_bytes(pubkey)?;
    Ok(*crate::ecdh::diffie_hellman_xonly(&secret, &peer)?.as_bytes())
}

/// Signs a 32-byte message hash, returning `r ‖ s`.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_sign(msg_hash: &[u8], seckey: &[u8]) -> Result<[u8; crate::ecdsa::SIGNATURE_SIZE]> {
    let msg_hash = codec::fixed::<MESSAGE_HASH_SIZE>(msg_hash)?;
    let secret = SecretKey::from_bytes(seckey)?;
    Ok(crate::ecdsa::sign_prehash(&secret, msg_hash)?.to_bytes())
}

/// Signs a 32-byte message hash, returning `r ‖ s` and the recovery id.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_sign_recoverable(
    msg_hash: &[u8],
    seckey: &[u8],
) -> Result<([u8; crate::ecdsa::SIGNATURE_SIZE], u8)> {
    let msg_hash = codec::fixed::<MESSAGE_HASH_SIZE>(msg_hash)?;
    let secret = SecretKey::from_bytes(seckey)?;
    let (signature, recovery_id) = crate::ecdsa::sign_prehash_recoverable(&secret, msg_hash)?;
    Ok((signature.to_bytes(), recovery_id.to_byte()))
}

/// Verifies an `r ‖ s` signature against a compressed or uncompressed public key.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_verify(msg_hash: &[u8], signature: &[u8], pubkey: &[u8]) -> Result<bool> {
    let msg_hash = codec::fixed::<MESSAGE_HASH_SIZE>(msg_hash)?;
    let signature = crate::ecdsa::Signature::from_bytes(signature)?;
    let public = PublicKey::from_sec1_bytes(pubkey)?;
    crate::ecdsa::verify_prehash(&public, msg_hash, &signature)
}

/// Recovers the compressed public key from an `r ‖ s` signature and its recovery id.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_recover(
    msg_hash: &[u8],
    signature: &[u8],
    recovery_id: u8,
) -> Result<[u8; COMPRESSED_POINT_SIZE]> {
    let msg_hash = codec::fixed::<MESSAGE_HASH_SIZE>(msg_hash)?;
    let signature = crate::ecdsa::Signature::from_bytes(signature)?;
    let recovery_id = crate::ecdsa::RecoveryId::from_byte(recovery_id)?;
    Ok(crate::ecdsa::recover_from_prehash(msg_hash, &signature, recovery_id)?.to_compressed())
}

/// Converts an `r ‖ s` signature to DER.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_signature_to_der(signature: &[u8]) -> Result<Vec<u8>> {
    Ok(crate::ecdsa::Signature::from_bytes(signature)?.to_der())
}

/// Converts a DER signature to `r ‖ s`.
#[cfg(feature = "ecdsa")]
pub fn ecdsa_signature_from_der(der: &[u8]) -> Result<[u8; crate::ecdsa::SIGNATURE_SIZE]> {
    Ok(crate::ecdsa::Signature::from_der(der)?.to_bytes())
}

/// Signs a 32-byte message with BIP-340. `aux_rand` must be 32 bytes when present.
#[cfg(feature = "schnorr")]
pub fn schnorr_sign(
    msg: &[u8],
    seckey: &[u8],
    aux_rand: Option<&[u8]>,
) -> Result<[u8; crate::schnorr::SIGNATURE_SIZE]> {
    let msg = codec::fixed::<MESSAGE_HASH_SIZE>(msg)?;
    let aux_rand = aux_rand.map(codec::fixed::<32>).transpose()?;
    let secret = SecretKey::from_bytes(seckey)?;
    Ok(crate::schnorr::sign(&secret, msg, aux_rand)?.to_bytes())
}

/// Verifies a BIP-340 signature against a 32-byte x-only public key.
#[cfg(feature = "schnorr")]
pub fn schnorr_verify(msg: &[u8], signature: &[u8], pubkey: &[u8]) -> Result<bool> {
    let msg = codec::fixed::<MESSAGE_HASH_SIZE>(msg)?;
    let signature = crate::schnorr::Signature::from_bytes(signature)?;
    let public = crate::schnorr::XOnlyPublicKey::from_bytes(pubkey)?;
    crate::schnorr::verify(&public, msg, &signature)
}

/// Derives the 32-byte x-only public key of `seckey`.
#[cfg(feature = "schnorr")]
pub fn schnorr_pubkey(seckey: &[u8]) -> Result<[u8; codec::X_ONLY_SIZE]> {
    let secret = SecretKey::from_bytes(seckey)?;
    Ok(crate::schnorr::XOnlyPublicKey::from_secret_key(&secret)?.to_bytes())
}
