//! Bode sweep and crossover extraction.

use std::f64::consts::PI;

use cs_core::guards::{MAGNITUDE_DB_MAX, MAGNITUDE_DB_MIN, MAGNITUDE_EPSILON};
use cs_core::{clamp_finite, poly, Complex, Real};
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

/// Magnitude threshold that defines the bandwidth.
pub const BANDWIDTH_DB: Real = -3.0;

/// Phase levels reported as phase crossovers.
pub const PHASE_TARGETS_DEG: [Real; 3] = [-45.0, -90.0, -135.0];

/// One point of a Bode sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencySample {
    pub omega: Real,
    pub magnitude_db: Real,
    pub phase_deg: Real,
}

/// Bode data as parallel series ordered by ω.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResponse {
    pub omega: Vec<Real>,
    pub magnitude_db: Vec<Real>,
    pub phase_deg: Vec<Real>,
}

impl FrequencyResponse {
    pub fn from_parts(
        omega: Vec<Real>,
        magnitude_db: Vec<Real>,
        phase_deg: Vec<Real>,
    ) -> AnalysisResult<Self> {
        for (what, len) in [("magnitude", magnitude_db.len()), ("phase", phase_deg.len())] {
            if len != omega.len() {
                return Err(AnalysisError::LengthMismatch {
                    what,
                    expected: omega.len(),
                    got: len,
                });
            }
        }
        Ok(Self {
            omega,
            magnitude_db,
            phase_deg,
        })
    }

    pub fn len(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = FrequencySample> + '_ {
        self.omega
            .iter()
            .zip(&self.magnitude_db)
            .zip(&self.phase_deg)
            .map(|((&omega, &magnitude_db), &phase_deg)| FrequencySample {
                omega,
                magnitude_db,
                phase_deg,
            })
    }

    /// First frequency where the magnitude falls to -3 dB.
    pub fn bandwidth(&self) -> Option<Real> {
        find_crossover(&self.omega, &self.magnitude_db, BANDWIDTH_DB)
    }

    /// First frequency where the phase falls to `target_deg`.
    pub fn phase_crossover(&self, target_deg: Real) -> Option<Real> {
        find_crossover(&self.omega, &self.phase_deg, target_deg)
    }

    pub fn crossovers(&self) -> Crossovers {
        let [p45, p90, p135] = PHASE_TARGETS_DEG.map(|target| self.phase_crossover(target));
        Crossovers {
            bandwidth: self.bandwidth(),
            phase_45: p45,
            phase_90: p90,
            phase_135: p135,
        }
    }
}

/// Crossover frequencies in rad/s, `None` when not reached inside the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Crossovers {
    pub bandwidth: Option<Real>,
    pub phase_45: Option<Real>,
    pub phase_90: Option<Real>,
    pub phase_135: Option<Real>,
}

impl Crossovers {
    /// Phase crossovers paired with their target level.
    pub fn phase(&self) -> [(Real, Option<Real>); 3] {
        [
            (PHASE_TARGETS_DEG[0], self.phase_45),
            (PHASE_TARGETS_DEG[1], self.phase_90),
            (PHASE_TARGETS_DEG[2], self.phase_135),
        ]
    }
}

/// Evaluate H(jω) = num(jω)/den(jω) over `omega`.
///
/// Magnitude is `20·log10(|H| + ε)` clamped to [-200, 100] dB. Phase is the
/// argument of H in degrees, unwrapped along the sweep so it stays continuous.
pub fn bode(num: &[Real], den: &[Real], omega: &[Real]) -> FrequencyResponse {
    let mut magnitude_db = Vec::with_capacity(omega.len());
    let mut wrapped = Vec::with_capacity(omega.len());

    for &w in omega {
        let s = Complex::new(0.0, w);
        let n = poly::eval_complex(num, s);
        let d = poly::eval_complex(den, s);
        let mag = n.norm() / d.norm();
        magnitude_db.push(clamp_finite(
            20.0 * (mag + MAGNITUDE_EPSILON).log10(),
            MAGNITUDE_DB_MIN,
            MAGNITUDE_DB_MAX,
        ));
        // arg(n) - arg(d) stays defined where H itself does not.
        wrapped.push(n.arg() - d.arg());
    }

    let phase_deg = unwrap(&wrapped).into_iter().map(Real::to_degrees).collect();

    FrequencyResponse {
        omega: omega.to_vec(),
        magnitude_db,
        phase_deg,
    }
}

/// Remove 2π jumps between consecutive angles (radians).
fn unwrap(angles: &[Real]) -> Vec<Real> {
    let mut out = Vec::with_capacity(angles.len());
    let mut offset = 0.0;
    let mut prev: Option<Real> = None;
    for &a in angles {
        if let Some(p) = prev {
            let d = a - p;
            if d.abs() >= PI {
                let mut wrapped = (d + PI).rem_euclid(2.0 * PI) - PI;
                if wrapped == -PI && d > 0.0 {
                    wrapped = PI;
                }
                offset += wrapped - d;
            }
        }
        prev = Some(a);
        out.push(a + offset);
    }
    out
}

/// First ω at which `values` reaches `target` from above.
///
/// Linearly interpolates between the first sample at or below the target and
/// its predecessor. `None` if no sample reaches the target, or if the very
/// first sample already does (there is no bracketing pair).
pub fn find_crossover(omega: &[Real], values: &[Real], target: Real) -> Option<Real> {
    let i = values.iter().position(|v| *v <= target)?;
    if i == 0 || i >= omega.len() {
        return None;
    }
    let (w0, w1) = (omega[i - 1], omega[i]);
    let (v0, v1) = (values[i - 1], values[i]);
    if v0 == v1 {
        return Some(w1);
    }
    Some(w0 + (target - v0) * (w1 - w0) / (v1 - v0))
}
