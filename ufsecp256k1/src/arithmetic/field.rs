//! Field element modulo the curve internal modulus using 64-bit limbs.

use super::util::{
    add_limbs, choice_from_bit, limbs_from_be_bytes, limbs_from_be_hex, limbs_to_be_bytes, mac,
    mul_wide, select_limbs, sub_limbs,
};
use core::{
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use elliptic_curve::{
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
};

/// Base field characteristic for secp256k1 as a 4x64 big integer, least to most significant.
const MODULUS: [u64; 4] =
    limbs_from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

/// 2^256 - MODULUS, used for folding overflow back into the low 256 bits.
const MODULUS_CORRECTION: u64 = 0x1_0000_03D1;

/// Element of the secp256k1 base field (2^256 - 2^32 - 2^9 - 2^8 - 2^7 - 2^6 - 2^4 - 1).
///
/// Values are kept *weakly reduced*: any representative below 2^256 that is congruent to the
/// mathematical result. Arithmetic never produces anything larger, and every observer
/// ([`to_bytes`](Self::to_bytes), [`ct_eq`](ConstantTimeEq::ct_eq), [`is_zero`](Self::is_zero),
/// [`is_odd`](Self::is_odd)) normalizes first, so two representatives of the same value are
/// indistinguishable from outside this module.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) [u64; 4]);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self([0; 4]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Parses a big-endian hex string. Does not check the result for being in range.
    pub(crate) const fn from_hex_unchecked(hex: &str) -> Self {
        Self(limbs_from_be_hex(hex))
    }

    /// Parses the given byte array as a big-endian integer.
    /// Does not check the result for being in the correct range.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        let mut i = 0;
        while i < 32 {
            limbs[3 - i / 8] = (limbs[3 - i / 8] << 8) | bytes[i] as u64;
            i += 1;
        }
        Self(limbs)
    }

    /// Attempts to parse the given byte array as a big-endian field element.
    ///
    /// Returns None if the byte array does not contain a big-endian integer in the range
    /// [0, p).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let limbs = limbs_from_be_bytes(bytes);
        let (_, borrow) = sub_limbs(&limbs, &MODULUS);
        CtOption::new(Self(limbs), choice_from_bit(borrow))
    }

    /// Converts a small integer into a field element.
    pub const fn from_u64(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }

    /// Returns the big-endian encoding of the canonical value.
    pub fn to_bytes(self) -> [u8; 32] {
        limbs_to_be_bytes(&self.normalize().0)
    }

    /// Returns the canonical representative in [0, p).
    pub fn normalize(&self) -> Self {
        // The value is below 2^256 < 2p, so one conditional subtraction suffices.
        // self + (2^256 - p) carries out exactly when self >= p.
        let (reduced, carry) = add_limbs(&self.0, &[MODULUS_CORRECTION, 0, 0, 0]);
        Self(select_limbs(&self.0, &reduced, choice_from_bit(carry)))
    }

    /// Checks if the field element is equal to zero.
    pub fn is_zero(&self) -> Choice {
        self.normalize().0.as_slice().ct_eq([0u64; 4].as_slice())
    }

    /// Checks if the canonical value is odd.
    pub fn is_odd(&self) -> Choice {
        choice_from_bit(self.normalize().0[0])
    }

    /// Adds `carry * 2^256` to `limbs` by folding it back as `carry * (2^256 - p)`.
    #[inline]
    fn fold(limbs: &[u64; 4], carry: u64) -> Self {
        let (lo, hi) = mac(0, carry, MODULUS_CORRECTION, 0);
        let (sum, carry) = add_limbs(limbs, &[lo, hi, 0, 0]);
        // A second carry leaves a tiny sum behind, so this one cannot overflow.
        let (sum, _) = add_limbs(&sum, &[MODULUS_CORRECTION * carry, 0, 0, 0]);
        Self(sum)
    }

    /// Returns self + rhs mod p.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add_limbs(&self.0, &rhs.0);
        Self::fold(&sum, carry)
    }

    /// Returns 2 * self mod p.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns self - rhs mod p.
    pub fn sub(&self, rhs: &Self) -> Self {
        let rhs = rhs.normalize();
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        // On borrow the limbs hold self - rhs + 2^256; dropping the correction term leaves
        // self - rhs + p, which is nonnegative because rhs < p.
        let (diff, _) = sub_limbs(&diff, &[MODULUS_CORRECTION & borrow, 0, 0, 0]);
        Self(diff)
    }

    /// Returns -self mod p.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns self * rhs mod p.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::reduce_wide(mul_wide(&self.0, &rhs.0))
    }

    /// Multiplies by a single-limb integer.
    pub fn mul_single(&self, rhs: u32) -> Self {
        let mut limbs = [0u64; 4];
        let mut carry = 0;
        for (out, limb) in limbs.iter_mut().zip(self.0.iter()) {
            (*out, carry) = mac(0, *limb, rhs as u64, carry);
        }
        Self::fold(&limbs, carry)
    }

    /// Returns self * self mod p.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Reduces a 512-bit product as lo + hi * (2^256 - p).
    #[inline]
    fn reduce_wide(w: [u64; 8]) -> Self {
        let mut limbs = [0u64; 4];
        let mut carry = 0;
        for i in 0..4 {
            (limbs[i], carry) = mac(w[i], w[i + 4], MODULUS_CORRECTION, carry);
        }
        Self::fold(&limbs, carry)
    }

    /// Raises self to the power 2^k.
    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Shared prefix of the inversion and square root addition chains.
    /// Returns (x^(2^2 - 1), x^(2^22 - 1), x^(2^223 - 1)).
    fn pow_chain(&self) -> (Self, Self, Self) {
        let x2 = self.pow2k(1).mul(self);
        let x3 = x2.pow2k(1).mul(self);
        let x6 = x3.pow2k(3).mul(&x3);
        let x9 = x6.pow2k(3).mul(&x3);
        let x11 = x9.pow2k(2).mul(&x2);
        let x22 = x11.pow2k(11).mul(&x11);
        let x44 = x22.pow2k(22).mul(&x22);
        let x88 = x44.pow2k(44).mul(&x44);
        let x176 = x88.pow2k(88).mul(&x88);
        let x220 = x176.pow2k(44).mul(&x44);
        let x223 = x220.pow2k(3).mul(&x3);
        (x2, x22, x223)
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Computes self^(p - 2) with a fixed addition chain.
    pub fn invert(&self) -> CtOption<Self> {
        let (x2, x22, x223) = self.pow_chain();
        // The final result is then assembled using a sliding window over the blocks.
        let res = x223
            .pow2k(23)
            .mul(&x22)
            .pow2k(5)
            .mul(self)
            .pow2k(3)
            .mul(&x2)
            .pow2k(2)
            .mul(self);
        CtOption::new(res, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root exists.
    ///
    /// Computes self^((p + 1) / 4) and checks the result by squaring it.
    pub fn sqrt(&self) -> CtOption<Self> {
        let (x2, x22, x223) = self.pow_chain();
        let res = x223.pow2k(23).mul(&x22).pow2k(6).mul(&x2).pow2k(2);
        let is_root = res.square().ct_eq(self);
        CtOption::new(res, is_root)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x")?;
        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DefaultIsZeroes for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(select_limbs(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.normalize().0.as_slice().ct_eq(other.normalize().0.as_slice())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement::add(&self, &other)
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement::add(&self, other)
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement::add(self, other)
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, other: FieldElement) {
        *self = FieldElement::add(self, &other);
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement::sub(&self, &other)
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement::sub(&self, other)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement::sub(self, other)
    }
}

impl SubAssign<FieldElement> for FieldElement {
    fn sub_assign(&mut self, other: FieldElement) {
        *self = FieldElement::sub(self, &other);
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement::mul(&self, &other)
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement::mul(&self, other)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement::mul(self, other)
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, other: FieldElement) {
        *self = FieldElement::mul(self, &other);
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.negate()
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.negate()
    }
}
