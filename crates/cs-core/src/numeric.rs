use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Clamp to `[lo, hi]`, mapping NaN to zero so the result is always plottable.
pub fn clamp_finite(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_nan() { 0.0 } else { v.clamp(lo, hi) }
}
