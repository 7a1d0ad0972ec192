//! Field arithmetic over the BN254 scalar field.
//!
//! The rollup commits all state in `F_r` where `r` is the BN254 scalar-field
//! prime. Arithmetic is delegated to `ark-bn254`; this module wraps it in a
//! `FieldElement` newtype carrying the protocol-level operations: canonical
//! less-than, little-endian bit decomposition with a width check, big-endian
//! byte serialization and low-bit truncation (`trim`).
//!
//! The canonical wire encoding of a field element is 32 big-endian bytes with
//! no framing; the serde representation is that encoding as a `0x`-prefixed
//! hex string.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, MontFp, PrimeField};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of significant bits of the field modulus.
pub const MODULUS_BITS: usize = 254;

/// Errors produced by field decompositions and decodings.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The canonical value does not fit in the requested bit width.
    #[error("field element does not fit in {0} bits")]
    BitWidth(usize),

    /// A byte encoding denoted a value at or above the modulus.
    #[error("non-canonical field element encoding")]
    NonCanonical,
}

/// Element of the BN254 scalar field.
///
/// Invariant: the wrapped value is always the canonical representative in
/// `[0, r)`; every comparison and serialization below relies on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(pub(crate) Fr);

impl FieldElement {
    /// Zero element (additive identity).
    pub const ZERO: Self = Self(MontFp!("0"));

    /// One element (multiplicative identity).
    pub const ONE: Self = Self(MontFp!("1"));

    /// `r - 1`, the canonical representation of `-1`.
    pub const MINUS_ONE: Self =
        Self(MontFp!("21888242871839275222246405745257275088548364400416034343698204186575808495616"));

    /// Create a field element from a machine integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Create a field element from a 128-bit integer (reduces modulo `r`).
    pub fn from_u128(value: u128) -> Self {
        Self(Fr::from(value))
    }

    /// `2^exp` as a field element.
    ///
    /// # Panics
    ///
    /// Panics if `exp >= MODULUS_BITS` (the power would not be canonical).
    pub fn two_pow(exp: usize) -> Self {
        assert!(exp < MODULUS_BITS, "2^{exp} exceeds the field modulus");
        let mut bits = vec![false; exp + 1];
        bits[exp] = true;
        Self::from_le_bits(&bits)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Multiplicative inverse; `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }

    /// A square root, if the element is a quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        self.0.sqrt().map(Self)
    }

    /// Strict less-than on the canonical integer representatives.
    pub fn lt(&self, other: &Self) -> bool {
        self.0.into_bigint() < other.0.into_bigint()
    }

    /// Little-endian bit decomposition of exactly `n` bits.
    ///
    /// Fails with [`FieldError::BitWidth`] when the canonical value has a set
    /// bit at position `n` or above.
    pub fn to_le_bits(&self, n: usize) -> Result<Vec<bool>, FieldError> {
        let bits = self.0.into_bigint().to_bits_le();
        if bits.iter().skip(n).any(|bit| *bit) {
            return Err(FieldError::BitWidth(n));
        }
        let mut out = bits;
        out.resize(n, false);
        Ok(out)
    }

    /// `Σ bits[i] · 2^i` as a field element.
    pub fn from_le_bits(bits: &[bool]) -> Self {
        let mut acc = Self::ZERO;
        for bit in bits.iter().rev() {
            acc = acc + acc;
            if *bit {
                acc = acc + Self::ONE;
            }
        }
        acc
    }

    /// Keep the low `n` bits of the canonical representative.
    pub fn trim(&self, n: usize) -> Self {
        let bits = self.0.into_bigint().to_bits_le();
        let n = n.min(bits.len());
        Self::from_le_bits(&bits[..n])
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        out
    }

    /// Decode a canonical 32-byte big-endian encoding.
    ///
    /// Rejects encodings of values at or above the modulus so that every
    /// element has exactly one serialized form.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Result<Self, FieldError> {
        let fe = Self(Fr::from_be_bytes_mod_order(bytes));
        if fe.to_be_bytes() != *bytes {
            return Err(FieldError::NonCanonical);
        }
        Ok(fe)
    }

    /// Interpret arbitrary big-endian bytes as an integer reduced modulo `r`.
    ///
    /// Used only where the protocol reinterprets a foreign digest as a field
    /// element; everywhere else the canonical decoder applies.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Canonical value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        let limbs = self.0.into_bigint().0;
        if limbs[1] == 0 && limbs[2] == 0 && limbs[3] == 0 {
            Some(limbs[0])
        } else {
            None
        }
    }

    /// Parse a `0x`-prefixed (or bare) hex encoding of the canonical bytes.
    pub fn from_hex(text: &str) -> Result<Self, FieldError> {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        let raw = hex::decode(digits).map_err(|_| FieldError::NonCanonical)?;
        if raw.len() != 32 {
            return Err(FieldError::NonCanonical);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Self::from_be_bytes(&bytes)
    }

    /// `0x`-prefixed hex of the canonical bytes.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for FieldElement {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(D::Error::custom)
    }
}

// ========== Tests ==========
