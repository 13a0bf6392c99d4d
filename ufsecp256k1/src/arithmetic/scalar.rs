//! Scalar field arithmetic modulo n = 115792089237316195423570985008687907852837564279074904382605163141518161494337

use super::util::{
    add_limbs, choice_from_bit, limbs_from_be_bytes, limbs_from_be_hex, limbs_to_be_bytes, mac,
    mul_wide, select_limbs, sub_limbs,
};
use crate::{FieldBytes, ORDER_HEX};
use core::{
    fmt,
    iter::{Product, Sum},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use elliptic_curve::{
    ff::{self, Field, PrimeField},
    rand_core::{CryptoRngCore, RngCore},
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
};

/// Order of the secp256k1 group, least significant limb first.
pub(crate) const MODULUS: [u64; 4] =
    limbs_from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

/// 2^256 - n.
const NEG_MODULUS: [u64; 4] = [0x402D_A173_2FC9_BEBF, 0x4551_2319_50B7_5FC4, 1, 0];

/// floor(n / 2).
const FRAC_MODULUS_2: [u64; 4] =
    limbs_from_be_hex("7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0");

/// n - 2, the exponent used for inversion.
const MODULUS_MINUS_TWO: [u64; 4] =
    limbs_from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD036413F");

/// (t - 1) / 2 where n - 1 = 2^6 * t, least significant limb first.
const T_MINUS_ONE_DIV_TWO: [u64; 4] = [
    0x777f_a4bd_19a0_6c82,
    0xfd75_5db9_cd5e_9140,
    0xffff_ffff_ffff_ffff,
    0x01ff_ffff_ffff_ffff,
];

/// Scalars are elements in the finite field modulo n.
///
/// Every operation returns a fully reduced value in [0, n).
#[derive(Clone, Copy, Default)]
pub struct Scalar(pub(crate) [u64; 4]);

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self([0; 4]);

    /// Multiplicative identity.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Converts a small integer into a scalar.
    pub const fn from_u64(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }

    /// Attempts to parse the given byte array as a big-endian scalar.
    ///
    /// Returns None if the value is not in the range [0, n).
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let limbs = limbs_from_be_bytes(bytes);
        let (_, borrow) = sub_limbs(&limbs, &MODULUS);
        CtOption::new(Self(limbs), choice_from_bit(borrow))
    }

    /// Parses the given byte array as a big-endian integer and reduces it modulo n.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self::reduce(limbs_from_be_bytes(bytes))
    }

    /// Parses a 64-byte big-endian integer and reduces it modulo n.
    pub fn from_wide_bytes(bytes: &[u8; 64]) -> Self {
        let mut hi = [0u8; 32];
        let mut lo = [0u8; 32];
        hi.copy_from_slice(&bytes[..32]);
        lo.copy_from_slice(&bytes[32..]);

        let hi = limbs_from_be_bytes(&hi);
        let lo = limbs_from_be_bytes(&lo);
        Self::reduce_wide([lo[0], lo[1], lo[2], lo[3], hi[0], hi[1], hi[2], hi[3]])
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        limbs_to_be_bytes(&self.0)
    }

    /// Returns the little-endian encoding of this scalar, used to walk its windows.
    pub(crate) fn to_le_bytes(self) -> [u8; 32] {
        let mut bytes = self.to_bytes();
        bytes.reverse();
        bytes
    }

    /// Generates a uniformly random non-zero scalar by rejection sampling.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self::sample(rng)
    }

    fn sample(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            let candidate = Option::<Scalar>::from(Self::from_bytes(&bytes));
            if let Some(scalar) = candidate.filter(|s| !bool::from(s.is_zero())) {
                return scalar;
            }
        }
    }

    /// Checks if the scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.0.as_slice().ct_eq([0u64; 4].as_slice())
    }

    /// Checks if the scalar is greater than n / 2.
    pub fn is_high(&self) -> Choice {
        let (_, borrow) = sub_limbs(&FRAC_MODULUS_2, &self.0);
        choice_from_bit(borrow)
    }

    /// Conditionally subtracts n from a value below 2^256.
    #[inline]
    fn reduce(limbs: [u64; 4]) -> Self {
        let (reduced, borrow) = sub_limbs(&limbs, &MODULUS);
        Self(select_limbs(&reduced, &limbs, choice_from_bit(borrow)))
    }

    /// Reduces a 512-bit value by repeatedly folding the high half as hi * (2^256 - n).
    ///
    /// Each pass shrinks the high half by at least 127 bits, so four passes leave it empty.
    fn reduce_wide(w: [u64; 8]) -> Self {
        let mut acc = w;
        for _ in 0..4 {
            let lo = [acc[0], acc[1], acc[2], acc[3]];
            let hi = [acc[4], acc[5], acc[6], acc[7]];
            let mut folded = mul_wide(&hi, &NEG_MODULUS);

            let mut carry = 0;
            for i in 0..4 {
                (folded[i], carry) = mac(folded[i], lo[i], 1, carry);
            }
            for limb in folded.iter_mut().skip(4) {
                (*limb, carry) = mac(*limb, carry, 1, 0);
            }
            acc = folded;
        }
        Self::reduce([acc[0], acc[1], acc[2], acc[3]])
    }

    /// Returns self + rhs mod n.
    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add_limbs(&self.0, &rhs.0);
        let (reduced, borrow) = sub_limbs(&sum, &MODULUS);
        // Keep the unreduced sum only when it neither overflowed nor reached n.
        let keep_sum = choice_from_bit(borrow) & !choice_from_bit(carry);
        Self(select_limbs(&reduced, &sum, keep_sum))
    }

    /// Returns 2 * self mod n.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns self - rhs mod n.
    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        let correction = [
            MODULUS[0] & borrow,
            MODULUS[1] & borrow,
            MODULUS[2] & borrow,
            MODULUS[3] & borrow,
        ];
        let (diff, _) = add_limbs(&diff, &correction);
        Self(diff)
    }

    /// Returns -self mod n.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Returns self * rhs mod n.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::reduce_wide(mul_wide(&self.0, &rhs.0))
    }

    /// Returns self * self mod n.
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns the multiplicative inverse of self, if self is non-zero.
    ///
    /// Computes self^(n - 2) with fixed 4-bit windows. The exponent is public, so the
    /// sequence of squarings and multiplications is the same for every input.
    pub fn invert(&self) -> CtOption<Self> {
        let mut powers = [Self::ONE; 16];
        for i in 1..16 {
            powers[i] = powers[i - 1].mul(self);
        }

        let mut res = Self::ONE;
        for limb in MODULUS_MINUS_TWO.iter().rev() {
            for nibble in (0..16).rev() {
                res = res.square().square().square().square();
                let window = ((limb >> (nibble * 4)) & 0xf) as usize;
                res = res.mul(&powers[window]);
            }
        }
        CtOption::new(res, !self.is_zero())
    }

    /// Returns the square root of self, if it exists.
    ///
    /// n - 1 is divisible by 2^6 only, so this runs the constant-time Tonelli-Shanks
    /// variant from `ff`.
    pub fn sqrt(&self) -> CtOption<Self> {
        ff::helpers::sqrt_tonelli_shanks(self, T_MINUS_ONE_DIV_TWO)
    }

    /// Is the canonical value odd?
    pub fn is_odd(&self) -> Choice {
        choice_from_bit(self.0[0])
    }
}

impl Field for Scalar {
    const ZERO: Self = Self::ZERO;
    const ONE: Self = Self::ONE;

    fn random(mut rng: impl RngCore) -> Self {
        Self::sample(&mut rng)
    }

    #[must_use]
    fn square(&self) -> Self {
        Scalar::square(self)
    }

    #[must_use]
    fn double(&self) -> Self {
        Scalar::double(self)
    }

    fn invert(&self) -> CtOption<Self> {
        Scalar::invert(self)
    }

    fn sqrt(&self) -> CtOption<Self> {
        Scalar::sqrt(self)
    }

    fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
        ff::helpers::sqrt_ratio_generic(num, div)
    }
}

impl PrimeField for Scalar {
    type Repr = FieldBytes;

    const MODULUS: &'static str = ORDER_HEX;
    const NUM_BITS: u32 = 256;
    const CAPACITY: u32 = 255;
    const TWO_INV: Self = Self(limbs_from_be_hex(
        "7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A1",
    ));
    const MULTIPLICATIVE_GENERATOR: Self = Self::from_u64(7);
    const S: u32 = 6;
    const ROOT_OF_UNITY: Self = Self(limbs_from_be_hex(
        "0C1DC060E7A91986DF9879A3FBC483A898BDEAB680756045992F4B5402B052F2",
    ));
    const ROOT_OF_UNITY_INV: Self = Self(limbs_from_be_hex(
        "FD3AE181F12D7096EFC7B0C75B8CBB7277A275910AA413C3B6FB30A0884F0D1C",
    ));
    const DELTA: Self = Self(limbs_from_be_hex(
        "0000000000000000000CBC21FE4561C8D63B78E780E1341E199417C8C0BB7601",
    ));

    fn from_repr(repr: FieldBytes) -> CtOption<Self> {
        Scalar::from_bytes(&repr.into())
    }

    fn to_repr(&self) -> FieldBytes {
        self.to_bytes().into()
    }

    fn is_odd(&self) -> Choice {
        Scalar::is_odd(self)
    }
}

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Self::from_u64(k)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(0x")?;
        for byte in self.to_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

impl DefaultIsZeroes for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(select_limbs(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar::add(&self, &other)
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(&self, other)
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar::add(self, other)
    }
}

impl AddAssign<Scalar> for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = Scalar::add(self, &rhs);
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        Scalar::sub(&self, &other)
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar::sub(&self, other)
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar::sub(self, other)
    }
}

impl SubAssign<Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        *self = Scalar::sub(self, &rhs);
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar::mul(&self, &other)
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(&self, other)
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar::mul(self, other)
    }
}

impl MulAssign<Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = Scalar::mul(self, &rhs);
    }
}

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::add(self, rhs);
    }
}

impl SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::sub(self, rhs);
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::mul(self, rhs);
    }
}

impl Sum for Scalar {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Scalar::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Scalar> for Scalar {
    fn sum<I: Iterator<Item = &'a Scalar>>(iter: I) -> Self {
        iter.fold(Scalar::ZERO, |acc, x| acc + x)
    }
}

impl Product for Scalar {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Scalar::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Scalar> for Scalar {
    fn product<I: Iterator<Item = &'a Scalar>>(iter: I) -> Self {
        iter.fold(Scalar::ONE, |acc, x| acc * x)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}
