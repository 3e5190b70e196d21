//! Polynomial algebra on coefficient vectors.
//!
//! Coefficients are ordered highest degree first, so `[1.0, 7.0, 25.0]` is
//! `s² + 7s + 25`. Padding is always applied on the left; right padding would
//! multiply the polynomial by a power of `s`.

use nalgebra::{Complex, DMatrix};

use crate::Real;

/// Coefficients with magnitude below `RELATIVE_ZERO * max|c|` are leading zeros.
const RELATIVE_ZERO: Real = 1e-14;

/// Left-pad `p` with zeros to `len` coefficients. Longer inputs are returned unchanged.
pub fn pad_left(p: &[Real], len: usize) -> Vec<Real> {
    if p.len() >= len {
        return p.to_vec();
    }
    let mut out = vec![0.0; len - p.len()];
    out.extend_from_slice(p);
    out
}

/// Sum of two polynomials; the shorter operand is left-padded first.
pub fn add(a: &[Real], b: &[Real]) -> Vec<Real> {
    let len = a.len().max(b.len());
    let a = pad_left(a, len);
    let b = pad_left(b, len);
    a.iter().zip(&b).map(|(x, y)| x + y).collect()
}

/// Product of two polynomials (discrete convolution of the coefficients).
pub fn multiply(a: &[Real], b: &[Real]) -> Vec<Real> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

pub fn scale(p: &[Real], k: Real) -> Vec<Real> {
    p.iter().map(|c| c * k).collect()
}

/// True when every coefficient is below `threshold` in magnitude.
pub fn is_zero(p: &[Real], threshold: Real) -> bool {
    p.iter().all(|c| c.abs() < threshold)
}

/// Drop leading (highest-degree) zero coefficients.
pub fn trim_leading(p: &[Real]) -> &[Real] {
    let max_abs = p.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if max_abs == 0.0 {
        return &[];
    }
    let start = p
        .iter()
        .position(|c| c.abs() > max_abs * RELATIVE_ZERO)
        .unwrap_or(p.len());
    &p[start..]
}

/// Degree after trimming leading zeros; `None` for the zero polynomial.
pub fn degree(p: &[Real]) -> Option<usize> {
    let trimmed = trim_leading(p);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.len() - 1)
    }
}

/// Evaluate at a real point (Horner).
pub fn eval(p: &[Real], x: Real) -> Real {
    p.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Evaluate at a complex point (Horner).
pub fn eval_complex(p: &[Real], s: Complex<Real>) -> Complex<Real> {
    p.iter()
        .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
}

/// Cancel common factors of `s` shared by numerator and denominator.
///
/// Returns trimmed copies with matching trailing zero pairs removed. Used when
/// evaluating the DC gain of loops whose integrator cancels against a zero at
/// the origin.
pub fn cancel_common_origin(num: &[Real], den: &[Real]) -> (Vec<Real>, Vec<Real>) {
    let mut num = trim_leading(num).to_vec();
    let mut den = trim_leading(den).to_vec();
    while num.len() > 1
        && den.len() > 1
        && num.last().is_some_and(|c| *c == 0.0)
        && den.last().is_some_and(|c| *c == 0.0)
    {
        num.pop();
        den.pop();
    }
    (num, den)
}

/// All complex roots of `p`.
///
/// Leading zeros are dropped, trailing zeros contribute roots at the origin,
/// degrees one and two use closed forms and anything higher goes through the
/// eigenvalues of the companion matrix. The zero polynomial and constants have
/// no roots. Output order follows the solver and is not normalized.
pub fn roots(p: &[Real]) -> Vec<Complex<Real>> {
    let trimmed = trim_leading(p);
    if trimmed.len() < 2 {
        return Vec::new();
    }

    let trailing = trimmed.iter().rev().take_while(|c| **c == 0.0).count();
    let core = &trimmed[..trimmed.len() - trailing];

    let mut out = match core.len() {
        0 | 1 => Vec::new(),
        2 => vec![Complex::new(-core[1] / core[0], 0.0)],
        3 => quadratic_roots(core[0], core[1], core[2]).to_vec(),
        _ => companion_roots(core),
    };
    out.extend(std::iter::repeat_n(Complex::new(0.0, 0.0), trailing));
    out
}

/// Roots of `a s² + b s + c` with `a != 0`, using the cancellation-free form.
fn quadratic_roots(a: Real, b: Real, c: Real) -> [Complex<Real>; 2] {
    let disc = b * b - 4.0 * a * c;
    if disc >= 0.0 {
        let sign = if b >= 0.0 { 1.0 } else { -1.0 };
        let q = -0.5 * (b + sign * disc.sqrt());
        if q == 0.0 {
            return [Complex::new(0.0, 0.0), Complex::new(0.0, 0.0)];
        }
        [Complex::new(q / a, 0.0), Complex::new(c / q, 0.0)]
    } else {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a);
        [Complex::new(re, im), Complex::new(re, -im)]
    }
}

fn companion_roots(p: &[Real]) -> Vec<Complex<Real>> {
    let n = p.len() - 1;
    let mut companion = DMatrix::<Real>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -p[j + 1] / p[0];
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }
    companion.complex_eigenvalues().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real_parts(r: &[Complex<Real>]) -> Vec<Real> {
        let mut v: Vec<Real> = r.iter().map(|z| z.re).collect();
        v.sort_by(|a, b| a.total_cmp(b));
        v
    }

    #[test]
    fn add_pads_on_the_left() {
        // (s + 2) + (s² + 3s + 4) = s² + 4s + 6
        assert_eq!(add(&[1.0, 2.0], &[1.0, 3.0, 4.0]), vec![1.0, 4.0, 6.0]);
    }

    #[test]
    fn multiply_matches_hand_expansion() {
        // (s + 1)(s + 2) = s² + 3s + 2
        assert_eq!(multiply(&[1.0, 1.0], &[1.0, 2.0]), vec![1.0, 3.0, 2.0]);
        assert!(multiply(&[], &[1.0]).is_empty());
    }

    #[test]
    fn trim_and_degree() {
        assert_eq!(trim_leading(&[0.0, 0.0, 25.0]), &[25.0]);
        assert_eq!(degree(&[0.0, 1.0, 2.0]), Some(1));
        assert_eq!(degree(&[0.0, 0.0]), None);
    }

    #[test]
    fn eval_real_and_complex_agree_on_real_axis() {
        let p = [1.0, 7.0, 25.0];
        let z = eval_complex(&p, Complex::new(2.0, 0.0));
        assert_eq!(eval(&p, 2.0), 43.0);
        assert!((z.re - 43.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn roots_of_real_quadratic() {
        let r = roots(&[1.0, 3.0, 2.0]);
        assert_eq!(r.len(), 2);
        let re = sorted_real_parts(&r);
        assert!((re[0] + 2.0).abs() < 1e-12);
        assert!((re[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn roots_of_complex_quadratic_are_conjugate() {
        let r = roots(&[1.0, 2.0, 5.0]);
        assert!((r[0].re + 1.0).abs() < 1e-12);
        assert!((r[0].im.abs() - 2.0).abs() < 1e-12);
        assert!((r[0].im + r[1].im).abs() < 1e-12);
    }

    #[test]
    fn roots_of_cubic_via_companion() {
        // (s + 1)(s + 2)(s + 3)
        let r = roots(&[1.0, 6.0, 11.0, 6.0]);
        let re = sorted_real_parts(&r);
        assert_eq!(re.len(), 3);
        assert!((re[0] + 3.0).abs() < 1e-8);
        assert!((re[1] + 2.0).abs() < 1e-8);
        assert!((re[2] + 1.0).abs() < 1e-8);
    }

    #[test]
    fn trailing_zeros_are_origin_roots() {
        // s (s + 4) with a padded leading zero
        let r = roots(&[0.0, 1.0, 4.0, 0.0]);
        let re = sorted_real_parts(&r);
        assert_eq!(re, vec![-4.0, 0.0]);
    }

    #[test]
    fn constants_and_zero_polynomial_have_no_roots() {
        assert!(roots(&[0.0, 0.0, 25.0]).is_empty());
        assert!(roots(&[0.0, 0.0, 0.0]).is_empty());
        assert!(roots(&[]).is_empty());
    }

    #[test]
    fn cancel_common_origin_removes_shared_integrator() {
        let (num, den) = cancel_common_origin(&[0.0, 2.0, 0.0], &[1.0, 3.0, 0.0]);
        assert_eq!(num, vec![2.0]);
        assert_eq!(den, vec![1.0, 3.0]);
    }
}
