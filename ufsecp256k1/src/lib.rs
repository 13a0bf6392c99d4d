#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Usage
//!
//! ```
//! # #[cfg(all(feature = "ecdsa", feature = "schnorr"))]
//! # {
//! use ufsecp256k1::{ecdsa, schnorr, SecretKey};
//!
//! ufsecp256k1::init()?;
//!
//! let secret = SecretKey::from_bytes(&[0x42; 32])?;
//! let prehash = ufsecp256k1::hash::sha256(b"hello");
//!
//! let signature = ecdsa::sign_prehash(&secret, &prehash)?;
//! assert!(ecdsa::verify_prehash(&secret.public_key()?, &prehash, &signature)?);
//!
//! let x_only = schnorr::XOnlyPublicKey::from_secret_key(&secret)?;
//! let signature = schnorr::sign(&secret, &prehash, None)?;
//! assert!(schnorr::verify(&x_only, &prehash, &signature)?);
//! # }
//! # Ok::<(), ufsecp256k1::Error>(())
//! ```

mod arithmetic;
mod error;
mod lifecycle;

pub mod api;
pub mod codec;
pub mod keys;

#[cfg(feature = "ecdh")]
pub mod ecdh;
#[cfg(feature = "ecdsa")]
pub mod ecdsa;
#[cfg(feature = "sha256")]
pub mod hash;
#[cfg(feature = "schnorr")]
pub mod schnorr;

pub use crate::{
    arithmetic::{
        mul::{
            ct_scalar_mul_generator, ct_scalar_mul_point, lincomb_vartime, scalar_mul_generator,
            scalar_mul_point, ConstantTime, ScalarMultiplier, VarTime,
        },
        AffinePoint, FieldElement, JacobianPoint, ProjectivePoint, Scalar,
    },
    error::{DecodeError, Error, Result},
    keys::{KeyPair, PublicKey, SecretKey},
    lifecycle::{init, selftest},
};

pub use elliptic_curve::{self, ff, group, subtle};

use elliptic_curve::{bigint::U256, consts::U32, FieldBytesEncoding};

/// Order of the secp256k1 group, as a big-endian hex string.
const ORDER_HEX: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";

/// secp256k1 (K-256) elliptic curve.
///
/// Marker type tying the point and scalar types into the `elliptic-curve` trait system, which
/// parameterizes SEC1 encodings over it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Secp256k1;

impl elliptic_curve::Curve for Secp256k1 {
    /// 32-byte serialized field elements.
    type FieldBytesSize = U32;

    /// 256-bit integer type used for internally representing field elements.
    type Uint = U256;

    /// Curve order.
    const ORDER: U256 = U256::from_be_hex(ORDER_HEX);
}

impl elliptic_curve::PrimeCurve for Secp256k1 {}

impl FieldBytesEncoding<Secp256k1> for U256 {}

/// Compressed SEC1-encoded secp256k1 point.
pub type CompressedPoint = elliptic_curve::sec1::CompressedPoint<Secp256k1>;

/// SEC1-encoded secp256k1 point.
pub type EncodedPoint = elliptic_curve::sec1::EncodedPoint<Secp256k1>;

/// secp256k1 field element or scalar serialized as bytes.
pub type FieldBytes = elliptic_curve::FieldBytes<Secp256k1>;
