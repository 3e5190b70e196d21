//! Pole and zero sets.
//!
//! Root finders return roots in whatever order their algorithm produces, and
//! that order changes between equivalent polynomials. A [`RootSet`] fixes the
//! order instead: real part descending (the slowest or least stable root
//! first), ties broken by imaginary part descending so the upper member of a
//! conjugate pair leads. The first root is the dominant one.

use std::cmp::Ordering;

use cs_core::guards::IMAGINARY_TOLERANCE;
use cs_core::{poly, Complex, Real};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Relative resolution at which real parts are considered tied.
const TIE_RESOLUTION: Real = 1e-9;

/// Roots of a polynomial in dominance order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootSet {
    roots: Vec<Complex<Real>>,
}

/// Roots of a closed-loop denominator.
pub type PoleSet = RootSet;
/// Roots of a closed-loop numerator.
pub type ZeroSet = RootSet;

impl RootSet {
    pub fn from_polynomial(coeffs: &[Real]) -> Self {
        Self::from_roots(poly::roots(coeffs))
    }

    pub fn from_roots(mut roots: Vec<Complex<Real>>) -> Self {
        let scale = roots.iter().fold(1.0_f64, |m, r| m.max(r.norm()));
        let quantum = TIE_RESOLUTION * scale;
        let key = |r: &Complex<Real>| (r.re / quantum).round();
        roots.sort_by(|a, b| match key(b).total_cmp(&key(a)) {
            Ordering::Equal => b.im.total_cmp(&a.im),
            other => other,
        });
        Self { roots }
    }

    /// First root in dominance order.
    pub fn dominant(&self) -> Option<Complex<Real>> {
        self.roots.first().copied()
    }

    /// Largest real part over all roots.
    pub fn max_real(&self) -> Option<Real> {
        self.roots.iter().map(|r| r.re).reduce(Real::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Complex<Real>> {
        self.roots.iter()
    }

    pub fn as_slice(&self) -> &[Complex<Real>] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Serialized as a list of `[re, im]` pairs.
impl Serialize for RootSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.roots.len()))?;
        for r in &self.roots {
            seq.serialize_element(&[r.re, r.im])?;
        }
        seq.end()
    }
}

/// Whether `root` has a non-negligible imaginary part.
pub fn is_complex(root: &Complex<Real>) -> bool {
    root.im.abs() > IMAGINARY_TOLERANCE
}
