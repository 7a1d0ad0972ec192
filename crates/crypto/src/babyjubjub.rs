//! Baby Jubjub curve arithmetic.
//!
//! Twisted Edwards curve `a·x² + y² = 1 + d·x²·y²` over the BN254 scalar
//! field with the standard parameters (`a = 168700`, `d = 168696`, cofactor
//! 8). `a` is a square and `d` is not, so the addition law is complete for
//! on-curve points.
//!
//! Points are handled in affine coordinates. The verifier only ever sees
//! x-coordinates; [`Point::decompress`] recovers the unique point in the
//! prime-order subgroup or fails.

use ark_ff::MontFp;
use thiserror::Error;

use crate::field::FieldElement;

/// Edwards coefficient `a`.
pub const EDWARDS_A: FieldElement = FieldElement(MontFp!("168700"));

/// Edwards coefficient `d`.
pub const EDWARDS_D: FieldElement = FieldElement(MontFp!("168696"));

/// Order of the prime subgroup (the curve order divided by the cofactor 8).
pub const SUBORDER: FieldElement = FieldElement(MontFp!(
    "2736030358979909402780800718157159386076813972158567259200215660948447373041"
));

/// Canonical generator of the prime-order subgroup (the base-8 point).
pub const BASE8: Point = Point {
    x: FieldElement(MontFp!(
        "5299619240641551281634865583518297030282874472190772894086521144482721001553"
    )),
    y: FieldElement(MontFp!(
        "16950150798460657717958625567821834550301663161624707787222815936182638968203"
    )),
};

/// Decompression failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// The x-coordinate does not correspond to any curve point.
    #[error("x-coordinate has no matching curve point")]
    NoSquareRoot,

    /// The candidate point does not satisfy the curve equation.
    #[error("point is not on the curve")]
    NotOnCurve,

    /// Neither root lies in the prime-order subgroup.
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
}

/// Affine curve point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl Point {
    /// Neutral element of the group.
    pub const IDENTITY: Point = Point {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
    };

    /// Check the curve equation.
    pub fn is_on_curve(&self) -> bool {
        let xx = self.x.square();
        let yy = self.y.square();
        EDWARDS_A * xx + yy == FieldElement::ONE + EDWARDS_D * xx * yy
    }

    /// Complete twisted Edwards addition.
    pub fn add(&self, other: &Point) -> Point {
        let cross = EDWARDS_D * self.x * other.x * self.y * other.y;
        // Denominators are nonzero for on-curve points (d is a non-square).
        let x = (self.x * other.y + self.y * other.x)
            * (FieldElement::ONE + cross)
                .inverse()
                .expect("complete addition law");
        let y = (self.y * other.y - EDWARDS_A * self.x * other.x)
            * (FieldElement::ONE - cross)
                .inverse()
                .expect("complete addition law");
        Point { x, y }
    }

    pub fn double(&self) -> Point {
        self.add(self)
    }

    /// Multiply by the cofactor 8.
    pub fn mul_by_cofactor(&self) -> Point {
        self.double().double().double()
    }

    /// Scalar multiplication by the canonical integer of `scalar`.
    pub fn mul(&self, scalar: &FieldElement) -> Point {
        let mut acc = Point::IDENTITY;
        for bit in scalar
            .to_le_bits(crate::field::MODULUS_BITS)
            .expect("canonical scalar fits the modulus width")
            .iter()
            .rev()
        {
            acc = acc.double();
            if *bit {
                acc = acc.add(self);
            }
        }
        acc
    }

    /// Membership in the prime-order subgroup.
    pub fn in_subgroup(&self) -> bool {
        self.mul(&SUBORDER) == Point::IDENTITY
    }

    /// Recover the subgroup point with the given x-coordinate.
    ///
    /// Solves `y² = (1 − a·x²)/(1 − d·x²)`; of the two roots, exactly one
    /// candidate can lie in the prime-order subgroup (the other differs by a
    /// small-order component). Fails if the quotient is a non-residue or if
    /// neither candidate passes the subgroup check.
    pub fn decompress(x: FieldElement) -> Result<Point, CurveError> {
        let xx = x.square();
        let denominator = FieldElement::ONE - EDWARDS_D * xx;
        let numerator = FieldElement::ONE - EDWARDS_A * xx;
        let y_squared = numerator
            * denominator
                .inverse()
                .ok_or(CurveError::NoSquareRoot)?;
        let y = y_squared.sqrt().ok_or(CurveError::NoSquareRoot)?;

        for y in [y, -y] {
            let candidate = Point { x, y };
            if !candidate.is_on_curve() {
                return Err(CurveError::NotOnCurve);
            }
            if candidate.in_subgroup() {
                return Ok(candidate);
            }
        }
        Err(CurveError::NotInSubgroup)
    }
}

// ========== Tests ==========
