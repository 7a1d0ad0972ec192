//! EdDSA over Baby Jubjub with a Poseidon challenge.
//!
//! Signatures travel packed: the x-coordinates of the public key and the
//! nonce point plus the response scalar. Verification decompresses both
//! points into the prime-order subgroup, derives the challenge with the
//! circom-parameterized Poseidon over `(R8.x, R8.y, A.x, A.y, msg)` and
//! checks the cofactored equation
//!
//! ```text
//! [8·s]·B8 == [8]·R8 + [8·h]·A
//! ```
//!
//! The challenge hash is Poseidon (width 6), not the Poseidon2 sponge used
//! everywhere else in the protocol; do not conflate the two.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::babyjubjub::{CurveError, Point, BASE8, SUBORDER};
use crate::field::FieldElement;

/// Signature verification failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// A packed x-coordinate does not decompress into the subgroup.
    #[error("signature point rejected: {0}")]
    Decompression(#[from] CurveError),

    /// The Poseidon challenge could not be computed.
    #[error("challenge hash failed")]
    Hash,

    /// The verification equation does not hold.
    #[error("signature equation does not hold")]
    Equation,
}

/// Packed EdDSA signature.
///
/// `a = 0` is the sentinel for a blank (no-op) transaction slot; no honest
/// public key has a zero x-coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePacked {
    /// x-coordinate of the public key.
    pub a: FieldElement,
    /// Response scalar.
    pub s: FieldElement,
    /// x-coordinate of the nonce point.
    pub r8: FieldElement,
}

impl SignaturePacked {
    /// Whether this signature marks a blank slot.
    pub fn is_blank(&self) -> bool {
        self.a.is_zero()
    }

    /// Verify the signature over a single-field message.
    pub fn verify(&self, message: FieldElement) -> Result<(), SignatureError> {
        let a = Point::decompress(self.a)?;
        let r8 = Point::decompress(self.r8)?;
        let h = challenge(&r8, &a, message)?;

        let lhs = BASE8.mul(&self.s).mul_by_cofactor();
        let rhs = r8
            .mul_by_cofactor()
            .add(&a.mul(&h).mul_by_cofactor());
        if lhs == rhs {
            Ok(())
        } else {
            Err(SignatureError::Equation)
        }
    }

    /// Produce a signature with the key `secret` over `message`.
    ///
    /// The nonce is derived deterministically from the key and the message,
    /// so signing never needs external randomness.
    pub fn sign(secret: FieldElement, message: FieldElement) -> Result<SignaturePacked, SignatureError> {
        let suborder = to_big(&SUBORDER);
        let sk = to_big(&secret) % &suborder;
        let secret = from_big(&sk);

        let public = BASE8.mul(&secret);

        let mut hasher = Poseidon::<Fr>::new_circom(2).map_err(|_| SignatureError::Hash)?;
        let seed = hasher
            .hash(&[secret.0, message.0])
            .map_err(|_| SignatureError::Hash)?;
        let rho = to_big(&FieldElement(seed)) % &suborder;
        let nonce_point = BASE8.mul(&from_big(&rho));

        let h = challenge(&nonce_point, &public, message)?;
        let s = (rho + to_big(&h) * sk) % &suborder;

        Ok(SignaturePacked {
            a: public.x,
            s: from_big(&s),
            r8: nonce_point.x,
        })
    }
}

/// Poseidon challenge `h = H(R8.x, R8.y, A.x, A.y, msg)`.
fn challenge(r8: &Point, a: &Point, message: FieldElement) -> Result<FieldElement, SignatureError> {
    let mut hasher = Poseidon::<Fr>::new_circom(5).map_err(|_| SignatureError::Hash)?;
    let digest = hasher
        .hash(&[r8.x.0, r8.y.0, a.x.0, a.y.0, message.0])
        .map_err(|_| SignatureError::Hash)?;
    Ok(FieldElement(digest))
}

fn to_big(value: &FieldElement) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

fn from_big(value: &BigUint) -> FieldElement {
    FieldElement::from_be_bytes_mod_order(&value.to_bytes_be())
}

// ========== Tests ==========
