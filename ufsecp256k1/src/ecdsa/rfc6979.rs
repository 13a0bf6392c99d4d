//! Deterministic nonce generation (RFC 6979) with HMAC-SHA-256.

use crate::{arithmetic::Scalar, Error, Result};
use elliptic_curve::zeroize::{Zeroize, Zeroizing};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC_DRBG state of RFC 6979 section 3.2.
///
/// Each call to [`next_nonce`](Self::next_nonce) yields the next candidate k in [1, n - 1];
/// the signer asks for another one when r or s comes out as zero.
pub(crate) struct Rfc6979 {
    k: [u8; 32],
    v: [u8; 32],
}

impl Rfc6979 {
    /// Seeds the generator with the secret scalar `x`, the reduced message hash `h1` and
    /// optional additional data (RFC 6979 section 3.6).
    pub(crate) fn new(x: &Scalar, h1: &Scalar, extra: Option<&[u8]>) -> Result<Self> {
        let x_bytes = Zeroizing::new(x.to_bytes());
        let h1_bytes = h1.to_bytes();
        let seed = [&x_bytes[..], &h1_bytes[..], extra.unwrap_or_default()];

        let mut drbg = Self {
            k: [0x00; 32],
            v: [0x01; 32],
        };
        drbg.update(0x00, &seed)?;
        drbg.update(0x01, &seed)?;
        Ok(drbg)
    }

    /// Returns the next nonce candidate in [1, n - 1].
    pub(crate) fn next_nonce(&mut self) -> Result<Scalar> {
        loop {
            self.v = hmac(&self.k, &[&self.v[..]])?;
            let candidate = Option::<Scalar>::from(Scalar::from_bytes(&self.v));

            // Step h.3: K = HMAC_K(V || 0x00), V = HMAC_K(V), both on rejection and before
            // any later call.
            self.update(0x00, &[])?;

            if let Some(k) = candidate.filter(|k| !bool::from(k.is_zero())) {
                return Ok(k);
            }
        }
    }

    /// K = HMAC_K(V || separator || seed), V = HMAC_K(V).
    fn update(&mut self, separator: u8, seed: &[&[u8]]) -> Result<()> {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(seed.len() + 2);
        parts.push(&self.v);
        parts.push(core::slice::from_ref(&separator));
        parts.extend_from_slice(seed);

        self.k = hmac(&self.k, &parts)?;
        self.v = hmac(&self.k, &[&self.v[..]])?;
        Ok(())
    }
}

impl Drop for Rfc6979 {
    fn drop(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
    }
}

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| Error::InternalArithmetic)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::Rfc6979;
    use crate::arithmetic::Scalar;
    use hex_literal::hex;

    #[test]
    fn nonces_are_deterministic_and_distinct() {
        let x = Scalar::ONE;
        let h1 = Scalar::from_bytes_reduced(&hex!(
            "A0DC65FFCA799873CBEA0AC274015B9526505DAAAED385155425F7337704883E"
        ));

        let mut first = Rfc6979::new(&x, &h1, None).unwrap();
        let mut second = Rfc6979::new(&x, &h1, None).unwrap();
        let k1 = first.next_nonce().unwrap();
        assert_eq!(k1, second.next_nonce().unwrap());
        assert_ne!(k1, first.next_nonce().unwrap());

        let mut with_extra = Rfc6979::new(&x, &h1, Some(&[0x42; 32][..])).unwrap();
        assert_ne!(k1, with_extra.next_nonce().unwrap());
    }
}
