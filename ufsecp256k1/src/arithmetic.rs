//! A pure-Rust implementation of group operations on secp256k1.

pub(crate) mod affine;
pub(crate) mod field;
pub(crate) mod jacobian;
pub mod mul;
pub(crate) mod projective;
pub(crate) mod scalar;
pub(crate) mod table;
pub(crate) mod util;

pub use self::{
    affine::AffinePoint, field::FieldElement, jacobian::JacobianPoint,
    projective::ProjectivePoint, scalar::Scalar,
};

const CURVE_EQUATION_B_SINGLE: u32 = 7u32;

pub(crate) const CURVE_EQUATION_B: FieldElement =
    FieldElement::from_u64(CURVE_EQUATION_B_SINGLE as u64);
