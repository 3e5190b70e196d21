//! Closed-form step and impulse responses of a second-order system.
//!
//! ```text
//!              K·ωn²
//! G(s) = ------------------
//!         s² + 2ζωn·s + ωn²
//! ```
//!
//! Higher-order closed loops are reduced to an equivalent (ωn, ζ, K) triple
//! first, see [`SecondOrderParams::from_closed_loop`].

use cs_core::guards::{
    CRITICAL_DAMPING_BAND, MIN_DAMPING_RATIO, MIN_NATURAL_FREQUENCY, RESPONSE_LIMIT,
    ROOT_COINCIDENCE,
};
use cs_core::{clamp_finite, poly, Real};
use cs_model::ClosedLoopModel;
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::roots::{is_complex, RootSet};

/// Response shape selected from the damping ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DampingRegime {
    /// |ζ| < 1, oscillatory.
    Underdamped,
    /// |ζ − 1| < 0.01, double pole.
    CriticallyDamped,
    /// Two real roots. Also covers ζ ≤ −1.
    Overdamped,
}

impl DampingRegime {
    /// Regime for an already floored damping ratio.
    pub fn classify(zeta: Real) -> Self {
        if (zeta - 1.0).abs() < CRITICAL_DAMPING_BAND {
            DampingRegime::CriticallyDamped
        } else if zeta.abs() < 1.0 {
            DampingRegime::Underdamped
        } else {
            DampingRegime::Overdamped
        }
    }
}

/// Equivalent second-order parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecondOrderParams {
    pub wn: Real,
    pub zeta: Real,
    pub k: Real,
}

impl SecondOrderParams {
    pub fn new(wn: Real, zeta: Real, k: Real) -> Self {
        Self { wn, zeta, k }
    }

    /// Extract (ωn, ζ, K) from a closed loop.
    ///
    /// A quadratic denominator gives ωn and ζ directly. Anything else falls
    /// back to the dominant pole. K is the DC gain, or 1 when the loop has
    /// an unbounded DC gain.
    pub fn from_closed_loop(model: &ClosedLoopModel) -> Self {
        let k = model.dc_gain().unwrap_or(1.0);
        let guarded = model.guarded_for_analysis();
        let (_, den) = poly::cancel_common_origin(guarded.num(), guarded.den());

        if let [a, b, c] = den[..] {
            let wn_sq = c / a;
            if wn_sq > 0.0 {
                let wn = wn_sq.sqrt();
                return Self::new(wn, b / (2.0 * a * wn), k);
            }
        }

        match RootSet::from_polynomial(&den).dominant() {
            Some(p) => {
                let wn = p.norm();
                let zeta = if is_complex(&p) && wn > 0.0 {
                    -p.re / wn
                } else if p.re > 0.0 {
                    -1.0
                } else {
                    1.0
                };
                Self::new(wn, zeta, k)
            }
            None => Self::new(MIN_NATURAL_FREQUENCY, 1.0, k),
        }
    }

    /// Copy with ωn and ζ moved off their singular values.
    pub fn guarded(&self) -> Self {
        let wn = if self.wn.abs() < MIN_NATURAL_FREQUENCY {
            MIN_NATURAL_FREQUENCY
        } else {
            self.wn.abs()
        };
        let zeta = if self.zeta.abs() < MIN_DAMPING_RATIO {
            MIN_DAMPING_RATIO
        } else {
            self.zeta
        };
        Self::new(wn, zeta, self.k)
    }

    pub fn regime(&self) -> DampingRegime {
        DampingRegime::classify(self.guarded().zeta)
    }
}

/// Sampled response y(t).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeResponse {
    pub time: Vec<Real>,
    pub value: Vec<Real>,
}

impl TimeResponse {
    pub fn from_parts(time: Vec<Real>, value: Vec<Real>) -> AnalysisResult<Self> {
        if time.len() != value.len() {
            return Err(AnalysisError::LengthMismatch {
                what: "time response",
                expected: time.len(),
                got: value.len(),
            });
        }
        Ok(Self { time, value })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Last sample, the closest thing to a steady-state value.
    pub fn final_value(&self) -> Option<Real> {
        self.value.last().copied()
    }

    /// Largest sample value.
    pub fn peak(&self) -> Option<Real> {
        self.value.iter().copied().reduce(Real::max)
    }
}

/// Unit step response sampled at `t`.
pub fn step_response(params: SecondOrderParams, t: &[Real]) -> TimeResponse {
    sample(params, t, Shape::Step)
}

/// Unit impulse response sampled at `t`.
pub fn impulse_response(params: SecondOrderParams, t: &[Real]) -> TimeResponse {
    sample(params, t, Shape::Impulse)
}

#[derive(Clone, Copy)]
enum Shape {
    Step,
    Impulse,
}

fn sample(params: SecondOrderParams, t: &[Real], shape: Shape) -> TimeResponse {
    let guarded = params.guarded();
    if guarded != params {
        tracing::warn!(
            wn = params.wn,
            zeta = params.zeta,
            "response parameters floored to wn={}, zeta={}",
            guarded.wn,
            guarded.zeta
        );
    }
    let SecondOrderParams { wn, zeta, k } = guarded;
    let eval: Box<dyn Fn(Real) -> Real> = match DampingRegime::classify(zeta) {
        DampingRegime::Underdamped => {
            let sigma = zeta * wn;
            let wd = wn * (1.0 - zeta * zeta).sqrt();
            match shape {
                Shape::Step => Box::new(move |t| {
                    let envelope = (-sigma * t).exp();
                    k * (1.0 - envelope * ((wd * t).cos() + sigma / wd * (wd * t).sin()))
                }),
                Shape::Impulse => {
                    Box::new(move |t| k * wn * wn / wd * (-sigma * t).exp() * (wd * t).sin())
                }
            }
        }
        DampingRegime::CriticallyDamped => repeated_root(-wn, k, shape),
        DampingRegime::Overdamped => {
            let root = wn * (zeta * zeta - 1.0).sqrt();
            let s1 = -zeta * wn + root;
            let s2 = -zeta * wn - root;
            if (s1 - s2).abs() <= ROOT_COINCIDENCE * wn {
                repeated_root(0.5 * (s1 + s2), k, shape)
            } else {
                // s1 > s2: with e^{s1 t} factored out the remainder stays bounded.
                match shape {
                    Shape::Step => Box::new(move |t| {
                        let rest = s2 - s1 * ((s2 - s1) * t).exp();
                        k * (1.0 + (s1 * t).exp() * rest / (s1 - s2))
                    }),
                    Shape::Impulse => Box::new(move |t| {
                        let rest = 1.0 - ((s2 - s1) * t).exp();
                        k * wn * wn * (s1 * t).exp() * rest / (s1 - s2)
                    }),
                }
            }
        }
    };

    let value = t
        .iter()
        .map(|&ti| {
            if ti < 0.0 {
                0.0
            } else {
                clamp_finite(eval(ti), -RESPONSE_LIMIT, RESPONSE_LIMIT)
            }
        })
        .collect();

    TimeResponse {
        time: t.to_vec(),
        value,
    }
}

/// Double real pole at `p`.
fn repeated_root(p: Real, k: Real, shape: Shape) -> Box<dyn Fn(Real) -> Real> {
    match shape {
        Shape::Step => Box::new(move |t| k * (1.0 - (1.0 - p * t) * (p * t).exp())),
        Shape::Impulse => Box::new(move |t| k * p * p * t * (p * t).exp()),
    }
}
