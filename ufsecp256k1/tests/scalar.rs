//! Scalar and field arithmetic tests.

use hex_literal::hex;
use proptest::prelude::*;
use ufsecp256k1::{codec, FieldElement, Scalar};

/// 2^256 mod n.
const TWO_POW_256: [u8; 32] = hex!("000000000000000000000000000000014551231950B75FC4402DA1732FC9BEBF");

prop_compose! {
    fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
        Scalar::from_bytes_reduced(&bytes)
    }
}

prop_compose! {
    fn field_element()(bytes in any::<[u8; 32]>()) -> FieldElement {
        Option::<FieldElement>::from(FieldElement::from_bytes(&bytes)).unwrap_or(FieldElement::ONE)
    }
}

proptest! {
    #[test]
    fn encoding_round_trips(a in scalar()) {
        prop_assert_eq!(codec::decode_scalar(&codec::encode_scalar(&a)).unwrap(), a);
    }

    #[test]
    fn addition_is_commutative_with_identity(a in scalar(), b in scalar()) {
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(a + Scalar::ZERO, a);
        prop_assert_eq!(a - a, Scalar::ZERO);
        prop_assert_eq!(a + (-a), Scalar::ZERO);
    }

    #[test]
    fn multiplication_distributes(a in scalar(), b in scalar(), c in scalar()) {
        prop_assert_eq!(a * (b + c), a * b + a * c);
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!(a.square(), a * a);
    }

    #[test]
    fn inverse(a in scalar()) {
        let inverse: Option<Scalar> = a.invert().into();
        match inverse {
            Some(inverse) => prop_assert_eq!(a * inverse, Scalar::ONE),
            None => prop_assert!(bool::from(a.is_zero())),
        }
    }

    #[test]
    fn wide_reduction(hi in any::<[u8; 32]>(), lo in any::<[u8; 32]>()) {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&hi);
        wide[32..].copy_from_slice(&lo);

        let shift = Scalar::from_bytes(&TWO_POW_256).unwrap();
        let expected =
            Scalar::from_bytes_reduced(&hi) * shift + Scalar::from_bytes_reduced(&lo);
        prop_assert_eq!(Scalar::from_wide_bytes(&wide), expected);
    }

    #[test]
    fn high_is_negation_of_low(a in scalar()) {
        prop_assume!(!bool::from(a.is_zero()));
        prop_assert_ne!(bool::from(a.is_high()), bool::from((-a).is_high()));
    }

    #[test]
    fn field_laws(a in field_element(), b in field_element()) {
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!((a + b) - b, a);
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!(a.square(), a * a);
        prop_assert_eq!(a.mul_single(7), a * FieldElement::from_u64(7));
        prop_assert_eq!(a.negate() + a, FieldElement::ZERO);
        prop_assert_eq!(codec::decode_field_element(&a.to_bytes()).unwrap(), a);
    }

    #[test]
    fn field_sqrt(a in field_element()) {
        let root: Option<FieldElement> = a.square().sqrt().into();
        let root = root.unwrap();
        prop_assert!(root == a || root == -a);
    }

    #[test]
    fn field_inverse(a in field_element()) {
        prop_assume!(!bool::from(a.is_zero()));
        let inverse: Option<FieldElement> = a.invert().into();
        prop_assert_eq!(a * inverse.unwrap(), FieldElement::ONE);
    }
}
