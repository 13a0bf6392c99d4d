//! Secret keys, public keys and key pairs.

use crate::{
    arithmetic::{
        mul::{ConstantTime, ScalarMultiplier, VarTime},
        AffinePoint, JacobianPoint, Scalar,
    },
    codec::{self, COMPRESSED_POINT_SIZE, UNCOMPRESSED_POINT_SIZE, X_ONLY_SIZE},
    EncodedPoint, Error, Result, Secp256k1,
};
use core::fmt;
use elliptic_curve::{
    rand_core::CryptoRngCore,
    sec1::ToEncodedPoint,
    zeroize::{Zeroize, ZeroizeOnDrop},
};

/// A secret scalar in [1, n - 1].
///
/// The scalar is wiped from memory when the key is dropped.
#[derive(Clone)]
pub struct SecretKey {
    inner: Scalar,
}

impl SecretKey {
    /// Parses a 32-byte big-endian secret key.
    ///
    /// Zero and values at or above the group order are rejected with
    /// [`Error::InvalidPrivateKey`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = codec::fixed::<32>(bytes)?;
        let scalar = Option::<Scalar>::from(Scalar::from_bytes(bytes))
            .ok_or(Error::InvalidPrivateKey)?;
        Self::from_scalar(scalar)
    }

    /// Wraps a non-zero scalar.
    pub fn from_scalar(scalar: Scalar) -> Result<Self> {
        if bool::from(scalar.is_zero()) {
            return Err(Error::InvalidPrivateKey);
        }
        Ok(Self { inner: scalar })
    }

    /// Generates a random secret key.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            inner: Scalar::random(rng),
        }
    }

    /// Returns the big-endian encoding of the secret scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Borrows the secret scalar.
    pub fn as_scalar(&self) -> &Scalar {
        &self.inner
    }

    /// Computes the public key `d * G` in constant time.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_affine(ConstantTime::mul_generator(&self.inner)?)
    }

    /// Returns the key for `-d`.
    pub fn negate(&self) -> Self {
        Self {
            inner: -self.inner,
        }
    }

    /// Returns the key for `d + tweak`.
    pub fn tweak_add(&self, tweak: &Scalar) -> Result<Self> {
        Self::from_scalar(self.inner + tweak)
    }

    /// Returns the key for `d * tweak`.
    pub fn tweak_mul(&self, tweak: &Scalar) -> Result<Self> {
        Self::from_scalar(self.inner * tweak)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for SecretKey {}

/// A validated public key: on the curve and never the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Wraps a point after checking that it is on the curve and not the identity.
    pub fn from_affine(point: AffinePoint) -> Result<Self> {
        if bool::from(point.is_identity()) || !bool::from(point.is_valid()) {
            return Err(Error::InvalidPoint);
        }
        Ok(Self { point })
    }

    /// Parses a 33-byte compressed or 65-byte uncompressed SEC1 encoding.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_affine(codec::decode_point(bytes)?)
    }

    /// Borrows the underlying point.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }

    /// Returns the 33-byte compressed encoding.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_POINT_SIZE] {
        let mut out = [0u8; COMPRESSED_POINT_SIZE];
        out.copy_from_slice(self.to_encoded_point(true).as_bytes());
        out
    }

    /// Returns the 65-byte uncompressed encoding.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_POINT_SIZE] {
        let mut out = [0u8; UNCOMPRESSED_POINT_SIZE];
        out.copy_from_slice(self.to_encoded_point(false).as_bytes());
        out
    }

    /// Returns the 32-byte x-coordinate.
    pub fn to_x_only(&self) -> [u8; X_ONLY_SIZE] {
        codec::encode_x_only(&self.point)
    }

    /// Returns the key for `Q + tweak * G`.
    pub fn tweak_add(&self, tweak: &Scalar) -> Result<Self> {
        let tweak_point = VarTime::mul_generator(tweak)?;
        let sum = JacobianPoint::from(self.point).add_mixed(&tweak_point);
        Self::from_affine(sum.to_affine())
    }

    /// Returns the key for `tweak * Q`.
    pub fn tweak_mul(&self, tweak: &Scalar) -> Result<Self> {
        Self::from_affine(VarTime::mul_point(tweak, &self.point)?)
    }
}

/// The point is never the identity, so the encoding always has the full width.
impl ToEncodedPoint<Secp256k1> for PublicKey {
    fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        self.point.to_encoded_point(compress)
    }
}

impl From<PublicKey> for AffinePoint {
    fn from(public_key: PublicKey) -> AffinePoint {
        public_key.point
    }
}

/// A secret key together with its public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Derives the public key of `secret`.
    pub fn from_secret_key(secret: SecretKey) -> Result<Self> {
        let public = secret.public_key()?;
        Ok(Self { secret, public })
    }

    /// Parses a secret key and derives its public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_secret_key(SecretKey::from_bytes(bytes)?)
    }

    /// Generates a random key pair.
    pub fn random(rng: &mut impl CryptoRngCore) -> Result<Self> {
        Self::from_secret_key(SecretKey::random(rng))
    }

    /// Borrows the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// Borrows the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyPair, PublicKey, SecretKey};
    use crate::{arithmetic::Scalar, Error};
    use hex_literal::hex;

    const N: [u8; 32] = hex!("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

    #[test]
    fn rejects_out_of_range_secrets() {
        assert_eq!(SecretKey::from_bytes(&[0u8; 32]), Err(Error::InvalidPrivateKey));
        assert_eq!(SecretKey::from_bytes(&N), Err(Error::InvalidPrivateKey));
        assert_eq!(SecretKey::from_bytes(&[0xFF; 32]), Err(Error::InvalidPrivateKey));
        assert!(matches!(SecretKey::from_bytes(&[1u8; 31]), Err(Error::Decode(_))));
    }

    #[test]
    fn secret_key_one_gives_generator() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let pair = KeyPair::from_bytes(&one).unwrap();
        assert_eq!(
            pair.public_key().to_compressed(),
            hex!("0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798")
        );
    }

    #[test]
    fn identity_is_not_a_public_key() {
        assert_eq!(PublicKey::from_sec1_bytes(&[0x00]), Err(Error::InvalidPoint));
        assert_eq!(PublicKey::from_sec1_bytes(&[0u8; 33]), Err(Error::InvalidPoint));
        assert_eq!(PublicKey::from_sec1_bytes(&[0u8; 65]), Err(Error::InvalidPoint));
    }

    #[test]
    fn tweaks_commute_with_derivation() {
        let secret = SecretKey::from_bytes(&hex!(
            "C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721"
        ))
        .unwrap();
        let public = secret.public_key().unwrap();
        let tweak = Scalar::from_u64(0x5EED);

        let added = secret.tweak_add(&tweak).unwrap();
        assert_eq!(added.public_key().unwrap(), public.tweak_add(&tweak).unwrap());

        let multiplied = secret.tweak_mul(&tweak).unwrap();
        assert_eq!(multiplied.public_key().unwrap(), public.tweak_mul(&tweak).unwrap());
    }

    #[test]
    fn tweak_to_zero_is_rejected() {
        let secret = SecretKey::from_scalar(Scalar::from_u64(5)).unwrap();
        let tweak = -Scalar::from_u64(5);
        assert_eq!(secret.tweak_add(&tweak), Err(Error::InvalidPrivateKey));
        assert_eq!(secret.tweak_mul(&Scalar::ZERO), Err(Error::InvalidPrivateKey));

        let public = secret.public_key().unwrap();
        assert_eq!(public.tweak_add(&tweak), Err(Error::InvalidPoint));
        assert_eq!(public.tweak_mul(&Scalar::ZERO), Err(Error::InvalidPoint));
    }

    #[test]
    fn negated_key_has_negated_public_key() {
        let secret = SecretKey::from_scalar(Scalar::from_u64(7)).unwrap();
        let public = *secret.public_key().unwrap().as_affine();
        let negated = *secret.negate().public_key().unwrap().as_affine();
        assert_eq!(negated, -public);
    }

    #[test]
    fn debug_does_not_print_secret() {
        let secret = SecretKey::from_scalar(Scalar::from_u64(7)).unwrap();
        assert_eq!(format!("{:?}", secret), "SecretKey { .. }");
    }
}
