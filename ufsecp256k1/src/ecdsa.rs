//! Elliptic Curve Digital Signature Algorithm (ECDSA).
//!
//! Signing uses deterministic nonces from RFC 6979 and always emits low-S signatures
//! (s ≤ n / 2). Verification enforces the same policy: a high-S signature is well formed but
//! does not verify.
//!
//! All functions take a 32-byte message hash; hashing the message is up to the caller.

mod der;
mod rfc6979;

pub use self::der::MAX_DER_SIZE;

use self::rfc6979::Rfc6979;
use crate::{
    arithmetic::{
        mul::{lincomb_vartime, ConstantTime, ScalarMultiplier},
        scalar, util, AffinePoint, FieldElement, Scalar,
    },
    codec,
    keys::{PublicKey, SecretKey},
    Error, Result,
};
use elliptic_curve::subtle::{Choice, ConditionallySelectable};

/// Size of a fixed-width `r ‖ s` signature.
pub const SIGNATURE_SIZE: usize = 64;

/// ECDSA signature with both components in [1, n - 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    /// Creates a signature from its components, rejecting zero values.
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Self> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(Error::InvalidSignature);
        }
        Ok(Self { r, s })
    }

    /// Parses a 64-byte `r ‖ s` signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = codec::fixed::<SIGNATURE_SIZE>(bytes)?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self::from_component_bytes(&r, &s)
    }

    fn from_component_bytes(r: &[u8; 32], s: &[u8; 32]) -> Result<Self> {
        let r = Option::<Scalar>::from(Scalar::from_bytes(r)).ok_or(Error::InvalidSignature)?;
        let s = Option::<Scalar>::from(Scalar::from_bytes(s)).ok_or(Error::InvalidSignature)?;
        Self::from_scalars(r, s)
    }

    /// Parses a strict ASN.1 DER signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let (r, s) = der::decode(bytes)?;
        Self::from_component_bytes(&r, &s)
    }

    /// Serializes as 64-byte `r ‖ s`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.r.to_bytes());
        out[32..].copy_from_slice(&self.s.to_bytes());
        out
    }

    /// Serializes as ASN.1 DER, at most [`MAX_DER_SIZE`] bytes.
    pub fn to_der(&self) -> Vec<u8> {
        der::encode(&self.r.to_bytes(), &self.s.to_bytes())
    }

    /// The `r` component.
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// The `s` component.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Is `s` at most n / 2?
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Returns the equivalent signature with `s` replaced by `n - s` if it is high.
    pub fn normalize_s(&self) -> Self {
        Self {
            r: self.r,
            s: Scalar::conditional_select(&self.s, &-self.s, self.s.is_high()),
        }
    }
}

/// Recovery id: which of the up to four candidate points was the signer's R.
///
/// Bit 0 is the parity of R.y, bit 1 is set when R.x was at least n and got reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Creates a recovery id from its two flags.
    pub const fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        Self((is_x_reduced as u8) << 1 | (is_y_odd as u8))
    }

    /// Parses a recovery id in 0..=3.
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte <= 3 {
            Ok(Self(byte))
        } else {
            Err(Error::OutOfRange)
        }
    }

    /// Is the y-coordinate of R odd?
    pub const fn is_y_odd(self) -> bool {
        self.0 & 1 != 0
    }

    /// Was the x-coordinate of R reduced modulo n?
    pub const fn is_x_reduced(self) -> bool {
        self.0 & 2 != 0
    }

    /// Returns the id as a byte in 0..=3.
    pub const fn to_byte(self) -> u8 {
        self.0
    }
}

/// Signs a 32-byte message hash with an RFC 6979 nonce.
pub fn sign_prehash(secret: &SecretKey, prehash: &[u8; 32]) -> Result<Signature> {
    sign_inner(secret, prehash, None).map(|(signature, _)| signature)
}

/// Signs a 32-byte message hash, mixing `extra` into the RFC 6979 seed.
pub fn sign_prehash_with_entropy(
    secret: &SecretKey,
    prehash: &[u8; 32],
    extra: &[u8; 32],
) -> Result<Signature> {
    sign_inner(secret, prehash, Some(extra)).map(|(signature, _)| signature)
}

/// Signs a 32-byte message hash and returns the recovery id along with the signature.
pub fn sign_prehash_recoverable(
    secret: &SecretKey,
    prehash: &[u8; 32],
) -> Result<(Signature, RecoveryId)> {
    sign_inner(secret, prehash, None)
}

fn sign_inner(
    secret: &SecretKey,
    prehash: &[u8; 32],
    extra: Option<&[u8; 32]>,
) -> Result<(Signature, RecoveryId)> {
    let d = secret.as_scalar();
    let z = Scalar::from_bytes_reduced(prehash);
    let mut nonces = Rfc6979::new(d, &z, extra.map(|e| &e[..]))?;

    loop {
        let k = nonces.next_nonce()?;
        let big_r = ConstantTime::mul_generator(&k)?;

        let x = big_r.x().to_bytes();
        let r = Scalar::from_bytes_reduced(&x);
        let x_reduced = bool::from(Scalar::from_bytes(&x).is_none());

        let k_inv = Option::<Scalar>::from(k.invert()).ok_or(Error::InternalArithmetic)?;
        let s = k_inv * (z + r * d);
        if bool::from(r.is_zero() | s.is_zero()) {
            tracing::debug!("nonce gave a zero signature component, drawing the next one");
            continue;
        }

        // Negating s mirrors R, which flips the parity of its y-coordinate.
        let high = s.is_high();
        let s = Scalar::conditional_select(&s, &-s, high);
        let y_is_odd = big_r.y_is_odd() ^ high;

        return Ok((
            Signature { r, s },
            RecoveryId::new(bool::from(y_is_odd), x_reduced),
        ));
    }
}

/// Verifies a signature over a 32-byte message hash.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify, including any
/// signature with a high `s`.
pub fn verify_prehash(
    public: &PublicKey,
    prehash: &[u8; 32],
    signature: &Signature,
) -> Result<bool> {
    if !signature.is_low_s() {
        tracing::trace!("rejecting high-S signature");
        return Ok(false);
    }

    let z = Scalar::from_bytes_reduced(prehash);
    let s_inv = Option::<Scalar>::from(signature.s.invert()).ok_or(Error::InvalidSignature)?;
    let u1 = z * s_inv;
    let u2 = signature.r * s_inv;

    let big_r = lincomb_vartime(&u1, &u2, public.as_affine())?;
    if bool::from(big_r.is_identity()) {
        return Ok(false);
    }
    Ok(Scalar::from_bytes_reduced(&big_r.x().to_bytes()) == signature.r)
}

/// Recovers the public key that produced `signature` over `prehash`.
pub fn recover_from_prehash(
    prehash: &[u8; 32],
    signature: &Signature,
    recovery_id: RecoveryId,
) -> Result<PublicKey> {
    let r = signature.r;
    let x = if recovery_id.is_x_reduced() {
        let (sum, carry) = util::add_limbs(&r.0, &scalar::MODULUS);
        if carry != 0 {
            return Err(Error::InvalidSignature);
        }
        FieldElement::from_bytes(&util::limbs_to_be_bytes(&sum))
    } else {
        FieldElement::from_bytes(&r.to_bytes())
    };
    let x = Option::<FieldElement>::from(x).ok_or(Error::InvalidSignature)?;

    let y_is_odd = Choice::from(recovery_id.is_y_odd() as u8);
    let big_r = Option::<AffinePoint>::from(AffinePoint::decompress(&x, y_is_odd))
        .ok_or(Error::InvalidSignature)?;

    // Q = r⁻¹ (s R - z G)
    let z = Scalar::from_bytes_reduced(prehash);
    let r_inv = Option::<Scalar>::from(r.invert()).ok_or(Error::InvalidSignature)?;
    let u1 = -(z * r_inv);
    let u2 = signature.s * r_inv;
    PublicKey::from_affine(lincomb_vartime(&u1, &u2, &big_r)?)
}
