//! Scalar multiplication.
//!
//! Two multipliers implement [`ScalarMultiplier`], and callers pick one by naming it:
//!
//! - [`VarTime`] runs in time that depends on the scalar. Use it for public scalars only,
//!   as in signature verification.
//! - [`ConstantTime`] performs the same sequence of field operations and memory accesses
//!   for every scalar. Use it whenever the scalar is secret.
//!
//! Both validate their result before returning it.

#![allow(clippy::needless_range_loop)]

use super::{
    table::{self, WINDOWS, WINDOW_SIZE},
    AffinePoint, JacobianPoint, ProjectivePoint, Scalar,
};
use crate::{Error, Result};

/// wNAF window width for the variable-time point multiplication.
const WNAF_WIDTH: usize = 5;

/// Number of odd multiples precomputed for the wNAF multiplication.
const WNAF_TABLE_SIZE: usize = 1 << (WNAF_WIDTH - 2);

/// Scalar multiplication of the generator and of arbitrary points.
pub trait ScalarMultiplier {
    /// Returns `[k] G`.
    fn mul_generator(k: &Scalar) -> Result<AffinePoint>;

    /// Returns `[k] point`.
    fn mul_point(k: &Scalar, point: &AffinePoint) -> Result<AffinePoint>;
}

/// Variable-time multiplication for public scalars.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarTime;

/// Constant-time multiplication for secret scalars.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantTime;

impl ScalarMultiplier for VarTime {
    fn mul_generator(k: &Scalar) -> Result<AffinePoint> {
        checked(mul_generator_vartime(k).to_affine())
    }

    fn mul_point(k: &Scalar, point: &AffinePoint) -> Result<AffinePoint> {
        checked(mul_point_vartime(k, point).to_affine())
    }
}

impl ScalarMultiplier for ConstantTime {
    fn mul_generator(k: &Scalar) -> Result<AffinePoint> {
        let mut trace = MulTrace::default();
        checked(mul_generator_ct(k, &mut trace).to_affine())
    }

    fn mul_point(k: &Scalar, point: &AffinePoint) -> Result<AffinePoint> {
        let mut trace = MulTrace::default();
        checked(mul_point_ct(k, &ProjectivePoint::from(point), &mut trace).to_affine())
    }
}

/// Computes `[k] G` in variable time.
pub fn scalar_mul_generator(k: &Scalar) -> Result<AffinePoint> {
    VarTime::mul_generator(k)
}

/// Computes `[k] point` in variable time.
pub fn scalar_mul_point(k: &Scalar, point: &AffinePoint) -> Result<AffinePoint> {
    VarTime::mul_point(k, point)
}

/// Computes `[k] G` in constant time.
pub fn ct_scalar_mul_generator(k: &Scalar) -> Result<AffinePoint> {
    ConstantTime::mul_generator(k)
}

/// Computes `[k] point` in constant time.
pub fn ct_scalar_mul_point(k: &Scalar, point: &AffinePoint) -> Result<AffinePoint> {
    ConstantTime::mul_point(k, point)
}

/// Computes `[u1] G + [u2] point` in variable time.
pub fn lincomb_vartime(u1: &Scalar, u2: &Scalar, point: &AffinePoint) -> Result<AffinePoint> {
    let sum = mul_generator_vartime(u1).add(&mul_point_vartime(u2, point));
    checked(sum.to_affine())
}

/// Rejects results that are neither the identity nor on the curve.
fn checked(point: AffinePoint) -> Result<AffinePoint> {
    if bool::from(point.is_valid()) {
        Ok(point)
    } else {
        tracing::error!("scalar multiplication produced a point off the curve");
        Err(Error::InternalArithmetic)
    }
}

/// Operation counts of one constant-time multiplication.
///
/// The counts depend only on the code path, never on the scalar, which is what the tests
/// check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MulTrace {
    pub(crate) lookups: u32,
    pub(crate) entries_scanned: u32,
    pub(crate) additions: u32,
    pub(crate) doublings: u32,
}

/// Returns 4-bit window `i` of a little-endian scalar encoding.
#[inline(always)]
fn window(k: &[u8; 32], i: usize) -> u8 {
    (k[i >> 1] >> ((i & 1) * 4)) & 0xf
}

/// Fixed-window constant-time multiplication of an arbitrary point.
pub(crate) fn mul_point_ct(
    k: &Scalar,
    point: &ProjectivePoint,
    trace: &mut MulTrace,
) -> ProjectivePoint {
    let k = k.to_le_bytes();

    let mut pc = [ProjectivePoint::IDENTITY; WINDOW_SIZE];
    pc[1] = *point;
    for i in 2..WINDOW_SIZE {
        pc[i] = if i % 2 == 0 {
            pc[i / 2].double()
        } else {
            pc[i - 1].add(point)
        };
    }

    let mut q = ProjectivePoint::IDENTITY;
    let mut pos = WINDOWS - 1;

    loop {
        let slot = window(&k, pos);

        let t = table::select(&pc, slot, trace);

        q = q.add(&t);
        trace.additions += 1;

        if pos == 0 {
            break;
        }

        q = q.double().double().double().double();
        trace.doublings += 4;
        pos -= 1;
    }

    q
}

/// Constant-time multiplication of the generator using the precomputed table.
pub(crate) fn mul_generator_ct(k: &Scalar, trace: &mut MulTrace) -> ProjectivePoint {
    let k = k.to_le_bytes();
    let mut acc = ProjectivePoint::IDENTITY;

    for (i, lookup) in table::generator_table().iter().enumerate() {
        let t = lookup.select(window(&k, i), trace);

        acc = acc.add_mixed(&t);
        trace.additions += 1;
    }

    acc
}

/// Variable-time multiplication of the generator: one table addition per non-zero window.
pub(crate) fn mul_generator_vartime(k: &Scalar) -> JacobianPoint {
    let k = k.to_le_bytes();
    let table = table::generator_table();
    let mut acc = JacobianPoint::IDENTITY;

    for i in 0..WINDOWS {
        let slot = window(&k, i);
        if slot != 0 {
            acc = acc.add_mixed(table.window(i).get_vartime(slot));
        }
    }

    acc
}

/// Variable-time multiplication of an arbitrary point using a width-5 wNAF.
pub(crate) fn mul_point_vartime(k: &Scalar, point: &AffinePoint) -> JacobianPoint {
    if bool::from(point.is_identity()) {
        return JacobianPoint::IDENTITY;
    }

    let naf = wnaf(k);

    // Odd multiples P, 3P, 5P, ..., 15P.
    let base = JacobianPoint::from(*point);
    let twice = base.double();
    let mut odd = [base; WNAF_TABLE_SIZE];
    for i in 1..WNAF_TABLE_SIZE {
        odd[i] = odd[i - 1].add(&twice);
    }

    let mut acc = JacobianPoint::IDENTITY;
    for &digit in naf.iter().rev() {
        acc = acc.double();
        if digit > 0 {
            acc = acc.add(&odd[(digit / 2) as usize]);
        } else if digit < 0 {
            acc = acc.add(&odd[(-digit / 2) as usize].neg());
        }
    }

    acc
}

/// Width-5 non-adjacent form of `k`, least significant digit first.
///
/// Every non-zero digit is odd and lies in (-16, 16), and any two non-zero digits are at
/// least five positions apart.
fn wnaf(k: &Scalar) -> Vec<i8> {
    let width = 1i64 << WNAF_WIDTH;
    let half = width >> 1;

    // One extra limb absorbs the carries of negative digits.
    let mut limbs = [k.0[0], k.0[1], k.0[2], k.0[3], 0];
    let mut digits = Vec::with_capacity(257);

    while limbs.iter().any(|&limb| limb != 0) {
        let mut digit = 0i64;
        if limbs[0] & 1 == 1 {
            digit = (limbs[0] & (width as u64 - 1)) as i64;
            if digit >= half {
                digit -= width;
            }
            if digit > 0 {
                sub_small(&mut limbs, digit as u64);
            } else {
                add_small(&mut limbs, (-digit) as u64);
            }
        }
        digits.push(digit as i8);
        shr1(&mut limbs);
    }

    digits
}

fn sub_small(limbs: &mut [u64; 5], value: u64) {
    let mut borrow = value;
    for limb in limbs.iter_mut() {
        let (res, overflow) = limb.overflowing_sub(borrow);
        *limb = res;
        borrow = overflow as u64;
        if borrow == 0 {
            break;
        }
    }
}

fn add_small(limbs: &mut [u64; 5], value: u64) {
    let mut carry = value;
    for limb in limbs.iter_mut() {
        let (res, overflow) = limb.overflowing_add(carry);
        *limb = res;
        carry = overflow as u64;
        if carry == 0 {
            break;
        }
    }
}

fn shr1(limbs: &mut [u64; 5]) {
    for i in 0..4 {
        limbs[i] = (limbs[i] >> 1) | (limbs[i + 1] << 63);
    }
    limbs[4] >>= 1;
}
