//! Affine curve points.

use super::{FieldElement, JacobianPoint, ProjectivePoint, Scalar, CURVE_EQUATION_B};
use crate::{CompressedPoint, EncodedPoint, FieldBytes, Secp256k1};
use core::ops::{Mul, Neg};
use elliptic_curve::{
    group::{prime::PrimeCurveAffine, GroupEncoding},
    point::{AffineCoordinates, DecompressPoint},
    sec1::{self, FromEncodedPoint, ToEncodedPoint},
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    zeroize::DefaultIsZeroes,
};

/// secp256k1 curve point in affine coordinates.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate
    pub(crate) x: FieldElement,

    /// y-coordinate
    pub(crate) y: FieldElement,

    /// Is this point the point at infinity? 0 = no, 1 = yes
    ///
    /// This is a proxy for [`Choice`], but uses `u8` instead to permit `const`
    /// constructors for `IDENTITY` and `GENERATOR`.
    pub(crate) infinity: u8,
}

impl AffinePoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// Base point of secp256k1.
    ///
    /// ```text
    /// Gₓ = 79be667e f9dcbbac 55a06295 ce870b07 029bfcdb 2dce28d9 59f2815b 16f81798
    /// Gᵧ = 483ada77 26a3c465 5da4fbfc 0e1108a8 fd17b448 a6855419 9c47d08f fb10d4b8
    /// ```
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_hex_unchecked(
            "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        ),
        y: FieldElement::from_hex_unchecked(
            "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        ),
        infinity: 0,
    };

    /// Creates a point from its coordinates, checking the curve equation.
    pub fn from_coordinates(x: FieldElement, y: FieldElement) -> CtOption<Self> {
        let point = Self { x, y, infinity: 0 };
        CtOption::new(point, point.satisfies_curve_equation())
    }

    /// Is this point the point at infinity?
    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// Returns the canonical x-coordinate.
    pub fn x(&self) -> FieldElement {
        self.x.normalize()
    }

    /// Returns the canonical y-coordinate.
    pub fn y(&self) -> FieldElement {
        self.y.normalize()
    }

    /// Is the y-coordinate odd?
    pub fn y_is_odd(&self) -> Choice {
        self.y.is_odd()
    }

    /// Is this point either the identity or a point satisfying y² = x³ + 7?
    pub fn is_valid(&self) -> Choice {
        self.is_identity() | self.satisfies_curve_equation()
    }

    fn satisfies_curve_equation(&self) -> Choice {
        let lhs = self.y.square();
        let rhs = self.x.square() * self.x + CURVE_EQUATION_B;
        lhs.ct_eq(&rhs)
    }

    /// Recovers the point with the given x-coordinate and y parity.
    ///
    /// Returns `None` when x³ + 7 has no square root.
    pub fn decompress(x: &FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        let alpha = x.square() * x + CURVE_EQUATION_B;
        alpha.sqrt().map(|beta| {
            let y = FieldElement::conditional_select(&-beta, &beta, beta.is_odd().ct_eq(&y_is_odd));
            Self {
                x: *x,
                y,
                infinity: 0,
            }
        })
    }

    /// Recovers the point with the given x-coordinate and an even y-coordinate.
    pub fn lift_x(x: &FieldElement) -> CtOption<Self> {
        Self::decompress(x, Choice::from(0))
    }
}

impl AffineCoordinates for AffinePoint {
    type FieldRepr = FieldBytes;

    fn x(&self) -> FieldBytes {
        self.x.to_bytes().into()
    }

    fn y_is_odd(&self) -> Choice {
        self.y.is_odd()
    }
}

impl ConditionallySelectable for AffinePoint {
    #[inline(always)]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let both_identity = self.is_identity() & other.is_identity();
        let same_coordinates = self.x.ct_eq(&other.x)
            & self.y.ct_eq(&other.y)
            & self.infinity.ct_eq(&other.infinity);
        both_identity | same_coordinates
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for AffinePoint {}

impl DecompressPoint<Secp256k1> for AffinePoint {
    fn decompress(x_bytes: &FieldBytes, y_is_odd: Choice) -> CtOption<Self> {
        FieldElement::from_bytes(&(*x_bytes).into())
            .and_then(|x| AffinePoint::decompress(&x, y_is_odd))
    }
}

impl FromEncodedPoint<Secp256k1> for AffinePoint {
    /// Attempts to parse the given [`EncodedPoint`] as an SEC1-encoded [`AffinePoint`].
    ///
    /// # Returns
    ///
    /// `None` value if `encoded_point` is not on the secp256k1 curve, has a coordinate that
    /// is not below p, or uses the compact form.
    fn from_encoded_point(encoded_point: &EncodedPoint) -> CtOption<Self> {
        match encoded_point.coordinates() {
            sec1::Coordinates::Identity => CtOption::new(Self::IDENTITY, 1.into()),
            sec1::Coordinates::Compact { .. } => CtOption::new(Self::IDENTITY, 0.into()),
            sec1::Coordinates::Compressed { x, y_is_odd } => {
                <Self as DecompressPoint<Secp256k1>>::decompress(x, Choice::from(y_is_odd as u8))
            }
            sec1::Coordinates::Uncompressed { x, y } => {
                FieldElement::from_bytes(&(*y).into()).and_then(|y| {
                    FieldElement::from_bytes(&(*x).into())
                        .and_then(|x| AffinePoint::from_coordinates(x, y))
                })
            }
        }
    }
}

impl ToEncodedPoint<Secp256k1> for AffinePoint {
    fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        EncodedPoint::conditional_select(
            &EncodedPoint::from_affine_coordinates(
                &self.x.to_bytes().into(),
                &self.y.to_bytes().into(),
                compress,
            ),
            &EncodedPoint::identity(),
            self.is_identity(),
        )
    }
}

impl From<AffinePoint> for EncodedPoint {
    fn from(affine: AffinePoint) -> EncodedPoint {
        affine.to_encoded_point(false)
    }
}

impl GroupEncoding for AffinePoint {
    type Repr = CompressedPoint;

    /// NOTE: not constant-time with respect to identity point
    fn from_bytes(bytes: &Self::Repr) -> CtOption<Self> {
        EncodedPoint::from_bytes(bytes)
            .map(|point| CtOption::new(point, Choice::from(1)))
            .unwrap_or_else(|_| {
                // SEC1 identity encoding is technically 1-byte 0x00, but the
                // `GroupEncoding` API requires a fixed-width `Repr`
                let is_identity = bytes.ct_eq(&Self::Repr::default());
                CtOption::new(EncodedPoint::identity(), is_identity)
            })
            .and_then(|point| Self::from_encoded_point(&point))
    }

    fn from_bytes_unchecked(bytes: &Self::Repr) -> CtOption<Self> {
        // No unchecked conversion possible for compressed points
        <Self as GroupEncoding>::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Self::Repr {
        let encoded = self.to_encoded_point(true);
        let mut result = CompressedPoint::default();
        result[..encoded.len()].copy_from_slice(encoded.as_bytes());
        result
    }
}

impl PrimeCurveAffine for AffinePoint {
    type Curve = ProjectivePoint;
    type Scalar = Scalar;

    fn identity() -> AffinePoint {
        Self::IDENTITY
    }

    fn generator() -> AffinePoint {
        Self::GENERATOR
    }

    fn is_identity(&self) -> Choice {
        AffinePoint::is_identity(self)
    }

    fn to_curve(&self) -> ProjectivePoint {
        ProjectivePoint::from(*self)
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl From<ProjectivePoint> for AffinePoint {
    fn from(p: ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl From<&ProjectivePoint> for AffinePoint {
    fn from(p: &ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl From<JacobianPoint> for AffinePoint {
    fn from(p: JacobianPoint) -> AffinePoint {
        p.to_affine()
    }
}

impl Mul<Scalar> for AffinePoint {
    type Output = ProjectivePoint;

    fn mul(self, scalar: Scalar) -> ProjectivePoint {
        ProjectivePoint::from(self) * scalar
    }
}

impl Mul<&Scalar> for AffinePoint {
    type Output = ProjectivePoint;

    fn mul(self, scalar: &Scalar) -> ProjectivePoint {
        ProjectivePoint::from(self) * scalar
    }
}

impl Neg for AffinePoint {
    type Output = Self;

    fn neg(self) -> Self {
        AffinePoint {
            x: self.x,
            y: -self.y,
            infinity: self.infinity,
        }
    }
}

impl Neg for &AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        -(*self)
    }
}
