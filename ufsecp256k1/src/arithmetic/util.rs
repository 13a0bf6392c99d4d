//! Helper functions for 4x64-bit limb arithmetic.
//!
//! Limbs are stored least significant first. Borrows are returned as masks
//! (`0` or `u64::MAX`) so they can feed straight into bitwise selection.

use elliptic_curve::subtle::{Choice, ConditionallySelectable};

/// Computes `a + b + carry`, returning the result along with the new carry. 64-bit version.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow. 64-bit version.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a + (b * c) + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Returns `a + b` and the carry out of the top limb (0 or 1).
#[inline]
pub(crate) const fn add_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let (w0, carry) = adc(a[0], b[0], 0);
    let (w1, carry) = adc(a[1], b[1], carry);
    let (w2, carry) = adc(a[2], b[2], carry);
    let (w3, carry) = adc(a[3], b[3], carry);
    ([w0, w1, w2, w3], carry)
}

/// Returns `a - b` and the borrow mask out of the top limb.
#[inline]
pub(crate) const fn sub_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let (w0, borrow) = sbb(a[0], b[0], 0);
    let (w1, borrow) = sbb(a[1], b[1], borrow);
    let (w2, borrow) = sbb(a[2], b[2], borrow);
    let (w3, borrow) = sbb(a[3], b[3], borrow);
    ([w0, w1, w2, w3], borrow)
}

/// Schoolbook 256x256 -> 512-bit multiplication.
#[inline]
pub(crate) const fn mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut w = [0u64; 8];
    let mut i = 0;
    while i < 4 {
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(w[i + j], a[i], b[j], carry);
            w[i + j] = lo;
            carry = hi;
            j += 1;
        }
        w[i + 4] = carry;
        i += 1;
    }
    w
}

/// Selects `b` when `choice` is set, `a` otherwise.
#[inline]
pub(crate) fn select_limbs(a: &[u64; 4], b: &[u64; 4], choice: Choice) -> [u64; 4] {
    [
        u64::conditional_select(&a[0], &b[0], choice),
        u64::conditional_select(&a[1], &b[1], choice),
        u64::conditional_select(&a[2], &b[2], choice),
        u64::conditional_select(&a[3], &b[3], choice),
    ]
}

/// Turns a carry bit or a borrow mask into a [`Choice`].
#[inline(always)]
pub(crate) fn choice_from_bit(bit: u64) -> Choice {
    Choice::from((bit & 1) as u8)
}

/// Parses a 64-character big-endian hex string at compile time.
pub(crate) const fn limbs_from_be_hex(hex: &str) -> [u64; 4] {
    let bytes = hex.as_bytes();
    assert!(bytes.len() == 64, "hex string must encode exactly 32 bytes");

    let mut limbs = [0u64; 4];
    let mut i = 0;
    while i < 64 {
        let c = bytes[i];
        let nibble = match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => panic!("invalid hex digit"),
        };
        let pos = 63 - i;
        limbs[pos / 16] |= (nibble as u64) << ((pos % 16) * 4);
        i += 1;
    }
    limbs
}

pub(crate) fn limbs_from_be_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

pub(crate) fn limbs_to_be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (limb, chunk) in limbs.iter().zip(bytes.rchunks_exact_mut(8)) {
        chunk.copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}
