//! BIP-340 Schnorr signatures over x-only public keys.
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0340.mediawiki>

use crate::{
    arithmetic::{
        mul::{lincomb_vartime, ConstantTime, ScalarMultiplier},
        AffinePoint, FieldElement, Scalar,
    },
    codec::{self, X_ONLY_SIZE},
    hash::tagged_hash,
    keys::SecretKey,
    Error, Result,
};
use elliptic_curve::{subtle::ConditionallySelectable, zeroize::Zeroizing};

const AUX_TAG: &[u8] = b"BIP0340/aux";
const NONCE_TAG: &[u8] = b"BIP0340/nonce";
const CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";

/// Size of a `R.x ‖ s` signature.
pub const SIGNATURE_SIZE: usize = 64;

/// BIP-340 signature: the x-coordinate of the nonce point and the scalar `s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: FieldElement,
    s: Scalar,
}

impl Signature {
    /// Parses a 64-byte signature. `R.x ≥ p` or `s ≥ n` is [`Error::InvalidSignature`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = codec::fixed::<SIGNATURE_SIZE>(bytes)?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        let r = Option::<FieldElement>::from(FieldElement::from_bytes(&r))
            .ok_or(Error::InvalidSignature)?;
        let s = Option::<Scalar>::from(Scalar::from_bytes(&s)).ok_or(Error::InvalidSignature)?;
        Ok(Self { r, s })
    }

    /// Serializes as 64-byte `R.x ‖ s`.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        out[..32].copy_from_slice(&self.r.to_bytes());
        out[32..].copy_from_slice(&self.s.to_bytes());
        out
    }
}

/// x-only public key: the point with this x-coordinate and even y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XOnlyPublicKey {
    point: AffinePoint,
}

impl XOnlyPublicKey {
    /// Parses a 32-byte x-coordinate and lifts it to the point with even y.
    ///
    /// `x ≥ p` is [`Error::OutOfRange`]; an x with no point on the curve is
    /// [`Error::InvalidPoint`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            point: codec::decode_x_only(bytes)?,
        })
    }

    /// Derives the x-only public key of a secret key in constant time.
    pub fn from_secret_key(secret: &SecretKey) -> Result<Self> {
        let point = ConstantTime::mul_generator(secret.as_scalar())?;
        Ok(Self {
            point: AffinePoint::conditional_select(&point, &-point, point.y_is_odd()),
        })
    }

    /// Serializes the x-coordinate.
    pub fn to_bytes(&self) -> [u8; X_ONLY_SIZE] {
        codec::encode_x_only(&self.point)
    }

    /// Borrows the lifted point.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }
}

/// Signs a 32-byte message. `aux_rand` defaults to 32 zero bytes.
///
/// The signature is verified before it is returned; a failure there is reported as
/// [`Error::InternalArithmetic`].
pub fn sign(secret: &SecretKey, msg: &[u8; 32], aux_rand: Option<&[u8; 32]>) -> Result<Signature> {
    let aux_rand = aux_rand.copied().unwrap_or([0u8; 32]);

    let d0 = secret.as_scalar();
    let big_p = ConstantTime::mul_generator(d0)?;
    let d = Scalar::conditional_select(d0, &-d0, big_p.y_is_odd());
    let p_bytes = codec::encode_x_only(&big_p);

    let mut t = Zeroizing::new(d.to_bytes());
    for (byte, mask) in t.iter_mut().zip(tagged_hash(AUX_TAG, &[&aux_rand[..]])) {
        *byte ^= mask;
    }

    let rand = tagged_hash(NONCE_TAG, &[&t[..], &p_bytes[..], &msg[..]]);
    let k0 = Scalar::from_bytes_reduced(&rand);
    if bool::from(k0.is_zero()) {
        return Err(Error::InternalArithmetic);
    }

    let big_r = ConstantTime::mul_generator(&k0)?;
    let k = Scalar::conditional_select(&k0, &-k0, big_r.y_is_odd());
    let r_bytes = codec::encode_x_only(&big_r);

    let e = challenge(&r_bytes, &p_bytes, msg);
    let signature = Signature {
        r: big_r.x(),
        s: k + e * d,
    };

    let public = XOnlyPublicKey {
        point: AffinePoint::conditional_select(&big_p, &-big_p, big_p.y_is_odd()),
    };
    if !verify(&public, msg, &signature)? {
        tracing::error!("freshly produced Schnorr signature failed verification");
        return Err(Error::InternalArithmetic);
    }
    Ok(signature)
}

/// Verifies a signature over a 32-byte message.
pub fn verify(public: &XOnlyPublicKey, msg: &[u8; 32], signature: &Signature) -> Result<bool> {
    let p_bytes = public.to_bytes();
    let r_bytes = signature.r.to_bytes();
    let e = challenge(&r_bytes, &p_bytes, msg);

    // R = s G - e P
    let big_r = lincomb_vartime(&signature.s, &-e, public.as_affine())?;
    if bool::from(big_r.is_identity()) || bool::from(big_r.y_is_odd()) {
        return Ok(false);
    }
    Ok(big_r.x() == signature.r)
}

fn challenge(r_bytes: &[u8; 32], p_bytes: &[u8; 32], msg: &[u8; 32]) -> Scalar {
    let e = tagged_hash(CHALLENGE_TAG, &[&r_bytes[..], &p_bytes[..], &msg[..]]);
    Scalar::from_bytes_reduced(&e)
}
