//! Stability classification and second-order performance estimates.

use std::f64::consts::PI;

use cs_core::guards::STABILITY_MARGIN;
use cs_core::{Complex, Real};
use serde::{Serialize, Serializer};

use crate::roots::{is_complex, PoleSet, RootSet, ZeroSet};

/// Stability verdict and dominant-pole metrics of a closed loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    /// Every pole has Re(p) < -STABILITY_MARGIN.
    pub is_stable: bool,
    /// First pole in dominance order, `None` when the denominator is constant.
    #[serde(serialize_with = "serialize_pole")]
    pub dominant_pole: Option<Complex<Real>>,
    /// |p| of the dominant pole.
    pub cl_wn: Real,
    /// -Re(p)/|p| for a complex dominant pole, 1 for a real one.
    pub cl_zeta: Real,
    /// Percent overshoot, only for 0 < ζ < 1.
    pub overshoot_pct: Option<Real>,
    /// 4 % settling time, only when ζ·ωn > 0.
    pub settling_time_s: Option<Real>,
    pub poles: PoleSet,
    pub zeros: ZeroSet,
}

/// Classify the closed loop `num/den` from its poles.
pub fn evaluate(den: &[Real], num: &[Real]) -> PerformanceSummary {
    let poles = RootSet::from_polynomial(den);
    let zeros = RootSet::from_polynomial(num);

    let is_stable = poles.iter().all(|p| p.re < -STABILITY_MARGIN);
    let dominant_pole = poles.dominant();

    let (cl_wn, cl_zeta) = match dominant_pole {
        Some(p) => {
            let wn = p.norm();
            let zeta = if is_complex(&p) && wn > 0.0 {
                -p.re / wn
            } else {
                1.0
            };
            (wn, zeta)
        }
        None => (0.0, 1.0),
    };

    PerformanceSummary {
        is_stable,
        dominant_pole,
        cl_wn,
        cl_zeta,
        overshoot_pct: overshoot_pct(cl_zeta),
        settling_time_s: settling_time(cl_wn, cl_zeta),
        poles,
        zeros,
    }
}

fn serialize_pole<S: Serializer>(
    pole: &Option<Complex<Real>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    pole.map(|p| [p.re, p.im]).serialize(serializer)
}

/// exp(-ζπ/√(1-ζ²))·100 for an underdamped pair.
pub fn overshoot_pct(zeta: Real) -> Option<Real> {
    if zeta > 0.0 && zeta < 1.0 {
        Some((-zeta * PI / (1.0 - zeta * zeta).sqrt()).exp() * 100.0)
    } else {
        None
    }
}

/// 4 / (ζ·ωn), the 4 % settling time of the dominant mode.
pub fn settling_time(wn: Real, zeta: Real) -> Option<Real> {
    let sigma = zeta * wn;
    if sigma > 0.0 { Some(4.0 / sigma) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_real_poles() {
        // (s + 1)(s + 2)
        let summary = evaluate(&[1.0, 3.0, 2.0], &[0.0, 0.0, 2.0]);
        assert!(summary.is_stable);
        assert_eq!(summary.cl_zeta, 1.0);
        assert!((summary.cl_wn - 1.0).abs() < 1e-12);
        assert_eq!(summary.overshoot_pct, None);
        assert!((summary.settling_time_s.unwrap() - 4.0).abs() < 1e-12);
        assert!(summary.zeros.is_empty());
    }

    #[test]
    fn right_half_plane_pole_is_unstable() {
        // (s + 1)(s - 0.5) = s² + 0.5s - 0.5
        let summary = evaluate(&[1.0, 0.5, -0.5], &[0.0, 0.0, 1.0]);
        assert!(!summary.is_stable);
        assert!((summary.dominant_pole.unwrap().re - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pole_on_imaginary_axis_is_unstable() {
        let summary = evaluate(&[1.0, 0.0, 4.0], &[0.0, 0.0, 4.0]);
        assert!(!summary.is_stable);
        assert_eq!(summary.cl_zeta, 0.0);
        assert_eq!(summary.overshoot_pct, None);
        assert_eq!(summary.settling_time_s, None);
    }

    #[test]
    fn standard_second_order_metrics() {
        let summary = evaluate(&[1.0, 7.0, 25.0], &[0.0, 0.0, 25.0]);
        assert!(summary.is_stable);
        assert!((summary.cl_wn - 5.0).abs() < 1e-9);
        assert!((summary.cl_zeta - 0.7).abs() < 1e-9);
        let expected_os = (-0.7 * PI / 0.51_f64.sqrt()).exp() * 100.0;
        assert!((summary.overshoot_pct.unwrap() - expected_os).abs() < 1e-6);
        assert!((summary.overshoot_pct.unwrap() - 4.59).abs() < 0.01);
        assert!((summary.settling_time_s.unwrap() - 4.0 / 3.5).abs() < 1e-9);
    }

    #[test]
    fn constant_denominator_has_no_dominant_pole() {
        let summary = evaluate(&[0.0, 0.0, 1.0], &[0.0, 0.0, 1.0]);
        assert!(summary.is_stable);
        assert_eq!(summary.dominant_pole, None);
        assert_eq!(summary.settling_time_s, None);
    }

    #[test]
    fn origin_pole_is_unstable() {
        // PID with zero gains: den = s (s² + 7s + 25)
        let summary = evaluate(&[0.0, 1.0, 7.0, 25.0, 0.0], &[0.0; 5]);
        assert!(!summary.is_stable);
        assert_eq!(summary.dominant_pole.unwrap(), Complex::new(0.0, 0.0));
        assert!(summary.zeros.is_empty());
    }
}
