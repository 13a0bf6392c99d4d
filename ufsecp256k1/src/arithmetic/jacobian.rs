//! Jacobian curve points for variable-time arithmetic on public data.
//!
//! These formulas branch on the identity, on equal inputs and on opposite inputs. They are
//! only used where every operand is public: signature verification, public key tweaks and
//! the explicitly variable-time multiplier.

use super::{AffinePoint, FieldElement};
use core::ops::Neg;

/// Point on secp256k1 in Jacobian coordinates, (X : Y : Z) ↦ (X/Z², Y/Z³).
#[derive(Clone, Copy, Debug)]
pub struct JacobianPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl JacobianPoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of secp256k1.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    /// Is this point the identity?
    pub fn is_identity(&self) -> bool {
        self.z.is_zero().into()
    }

    /// Returns the affine representation of this point.
    pub fn to_affine(&self) -> AffinePoint {
        self.z
            .invert()
            .map(|zinv| {
                let zinv2 = zinv.square();
                AffinePoint {
                    x: self.x * &zinv2,
                    y: self.y * &(zinv2 * &zinv),
                    infinity: 0,
                }
            })
            .unwrap_or(AffinePoint::IDENTITY)
    }

    /// Returns `2 * self` using dbl-2009-l.
    pub fn double(&self) -> Self {
        if self.is_identity() {
            return Self::IDENTITY;
        }

        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + &b).square() - &a - &c).double();
        let e = a.double() + &a;
        let f = e.square();

        let x3 = f - &d.double();
        let y3 = e * &(d - &x3) - &c.double().double().double();
        let z3 = (self.y * &self.z).double();
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `self + other` using add-1998-cmo-2.
    pub fn add(&self, other: &Self) -> Self {
        if self.is_identity() {
            return *other;
        }
        if other.is_identity() {
            return *self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * &z2z2;
        let u2 = other.x * &z1z1;
        let s1 = self.y * &other.z * &z2z2;
        let s2 = other.y * &self.z * &z1z1;

        let h = u2 - &u1;
        let r = s2 - &s1;
        if bool::from(h.is_zero()) {
            return if bool::from(r.is_zero()) {
                self.double()
            } else {
                Self::IDENTITY
            };
        }

        let hh = h.square();
        let hhh = h * &hh;
        let v = u1 * &hh;

        let x3 = r.square() - &hhh - &v.double();
        let y3 = r * &(v - &x3) - &(s1 * &hhh);
        let z3 = self.z * &other.z * &h;
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `self + other` where `other` is affine (Z2 = 1).
    pub fn add_mixed(&self, other: &AffinePoint) -> Self {
        if bool::from(other.is_identity()) {
            return *self;
        }
        if self.is_identity() {
            return Self::from(*other);
        }

        let z1z1 = self.z.square();
        let u2 = other.x * &z1z1;
        let s2 = other.y * &self.z * &z1z1;

        let h = u2 - &self.x;
        let r = s2 - &self.y;
        if bool::from(h.is_zero()) {
            return if bool::from(r.is_zero()) {
                self.double()
            } else {
                Self::IDENTITY
            };
        }

        let hh = h.square();
        let hhh = h * &hh;
        let v = self.x * &hh;

        let x3 = r.square() - &hhh - &v.double();
        let y3 = r * &(v - &x3) - &(self.y * &hhh);
        let z3 = self.z * &h;
        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `-self`.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

impl Default for JacobianPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PartialEq for JacobianPoint {
    fn eq(&self, other: &Self) -> bool {
        self.to_affine() == other.to_affine()
    }
}

impl Eq for JacobianPoint {}

impl From<AffinePoint> for JacobianPoint {
    fn from(p: AffinePoint) -> Self {
        if bool::from(p.is_identity()) {
            Self::IDENTITY
        } else {
            Self {
                x: p.x,
                y: p.y,
                z: FieldElement::ONE,
            }
        }
    }
}

impl Neg for JacobianPoint {
    type Output = JacobianPoint;

    fn neg(self) -> JacobianPoint {
        JacobianPoint::neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::JacobianPoint;
    use crate::arithmetic::{AffinePoint, ProjectivePoint};

    #[test]
    fn matches_complete_formulas() {
        let g = JacobianPoint::GENERATOR;
        let pg = ProjectivePoint::GENERATOR;

        let mut jac = g;
        let mut proj = pg;
        for _ in 0..8 {
            jac = jac.double().add(&g);
            proj = proj.double().add(&pg);
            assert_eq!(jac.to_affine(), proj.to_affine());
        }
        assert_eq!(
            jac.add_mixed(&AffinePoint::GENERATOR).to_affine(),
            proj.add_mixed(&AffinePoint::GENERATOR).to_affine()
        );
    }

    #[test]
    fn special_cases() {
        let g = JacobianPoint::GENERATOR;
        let identity = JacobianPoint::IDENTITY;

        assert_eq!(g.add(&g), g.double());
        assert!(g.add(&g.neg()).is_identity());
        assert_eq!(g.add(&identity), g);
        assert_eq!(identity.add(&g), g);
        assert!(identity.double().is_identity());

        assert_eq!(g.add_mixed(&AffinePoint::GENERATOR), g.double());
        assert!(g.add_mixed(&-AffinePoint::GENERATOR).is_identity());
        assert_eq!(identity.add_mixed(&AffinePoint::GENERATOR), g);
        assert_eq!(g.add_mixed(&AffinePoint::IDENTITY), g);
    }

    #[test]
    fn doubling_with_non_trivial_z() {
        let g = JacobianPoint::GENERATOR;
        let p = g.double().double();
        let q = p.add(&p);
        assert_eq!(q, p.double());
        assert_eq!(q.add(&p.neg()), p);
    }
}
