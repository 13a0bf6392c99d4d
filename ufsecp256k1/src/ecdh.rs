//! Elliptic Curve Diffie-Hellman key agreement.
//!
//! The shared point is always computed with the constant-time multiplier. Peers are
//! represented by [`PublicKey`], which cannot hold the identity or an off-curve point.

use crate::{
    arithmetic::{
        mul::{ConstantTime, ScalarMultiplier},
        AffinePoint,
    },
    codec,
    keys::{PublicKey, SecretKey},
    Error, Result,
};
use elliptic_curve::zeroize::{Zeroize, ZeroizeOnDrop};

/// Shared secret produced by [`diffie_hellman`]. Wiped from memory on drop.
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Borrows the raw shared secret bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl ZeroizeOnDrop for SharedSecret {}

fn shared_point(secret: &SecretKey, peer: &PublicKey) -> Result<AffinePoint> {
    let shared = ConstantTime::mul_point(secret.as_scalar(), peer.as_affine())?;
    if bool::from(shared.is_identity()) {
        // d is in [1, n - 1] and Q has order n, so this cannot happen.
        tracing::error!("ECDH produced the point at infinity");
        return Err(Error::InternalArithmetic);
    }
    Ok(shared)
}

/// Computes the x-coordinate of `d * Q`.
pub fn diffie_hellman(secret: &SecretKey, peer: &PublicKey) -> Result<SharedSecret> {
    let shared = shared_point(secret, peer)?;
    Ok(SharedSecret(codec::encode_x_only(&shared)))
}

/// Computes SHA-256 of the compressed encoding of `d * Q`.
#[cfg(feature = "sha256")]
pub fn diffie_hellman_sha256(secret: &SecretKey, peer: &PublicKey) -> Result<SharedSecret> {
    let shared = shared_point(secret, peer)?;
    let mut compressed = codec::encode_compressed(&shared)?;
    let digest = crate::hash::sha256(&compressed);
    compressed.zeroize();
    Ok(SharedSecret(digest))
}

/// Computes SHA-256 of the 32-byte x-coordinate of `d * Q`.
#[cfg(feature = "sha256")]
pub fn diffie_hellman_xonly(secret: &SecretKey, peer: &PublicKey) -> Result<SharedSecret> {
    let shared = shared_point(secret, peer)?;
    let mut x = codec::encode_x_only(&shared);
    let digest = crate::hash::sha256(&x);
    x.zeroize();
    Ok(SharedSecret(digest))
}
