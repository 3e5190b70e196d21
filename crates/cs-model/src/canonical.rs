//! Canonical second-order plant form and conversions to/from each method.
//!
//! Every plant method reduces to
//!
//! ```text
//!           num                K·ωn²
//! G(s) = -------  ~  ---------------------
//!           den       s² + 2ζωn·s + ωn²
//! ```
//!
//! ODE and Laplace plants keep their un-normalized denominator `[a2, a1, a0]`
//! and numerator `[0, 0, b]`, so consumers must not assume a monic `den`.

use std::fmt;

use cs_core::guards::{
    CONTROLLABILITY_THRESHOLD, DEGENERATE_THRESHOLD, MIN_DAMPING_RATIO, MIN_LEADING_COEFFICIENT,
    MIN_NATURAL_FREQUENCY, MIN_NUMERATOR, MIN_TIME_CONSTANT,
};
use cs_core::Real;
use serde::Serialize;

use crate::error::ModelResult;
use crate::plant::{PlantMethod, PlantParameterSet};

/// A numeric guard that replaced an input value during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelWarning {
    /// |A12| (or closed-loop A12) was below the controllability threshold and
    /// the numerator was replaced by a tiny constant.
    UncontrollableNumerator { original: Real, replacement: Real },
    /// Time constant was not positive.
    TimeConstantFloored { original: Real, replacement: Real },
    /// Natural frequency was not positive.
    NaturalFrequencyFloored { original: Real, replacement: Real },
    /// Damping ratio below the minimum.
    DampingFloored { original: Real, replacement: Real },
    /// Leading coefficient a2 was (nearly) zero.
    LeadingCoefficientFloored { original: Real, replacement: Real },
    /// ωn² was not positive; ωn and ζ fell back to 1.
    NoNaturalFrequency { wn_squared: Real },
    /// Denominator constant term was (nearly) zero; K fell back to 1.
    UndefinedDcGain { constant_term: Real },
}

impl fmt::Display for ModelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UncontrollableNumerator {
                original,
                replacement,
            } => write!(
                f,
                "state-space pair is uncontrollable/unobservable through A12 = {original:e}; numerator replaced by {replacement:e}"
            ),
            Self::TimeConstantFloored {
                original,
                replacement,
            } => write!(f, "time constant {original} raised to {replacement}"),
            Self::NaturalFrequencyFloored {
                original,
                replacement,
            } => write!(f, "natural frequency {original} raised to {replacement}"),
            Self::DampingFloored {
                original,
                replacement,
            } => write!(f, "damping ratio {original} raised to {replacement}"),
            Self::LeadingCoefficientFloored {
                original,
                replacement,
            } => write!(f, "leading coefficient {original} replaced by {replacement}"),
            Self::NoNaturalFrequency { wn_squared } => write!(
                f,
                "ωn² = {wn_squared} is not positive; using ωn = 1, ζ = 1"
            ),
            Self::UndefinedDcGain { constant_term } => write!(
                f,
                "denominator constant term {constant_term:e} is zero; using K = 1"
            ),
        }
    }
}

fn record(warnings: &mut Vec<ModelWarning>, warning: ModelWarning) {
    tracing::warn!(%warning, "plant parameter guard applied");
    warnings.push(warning);
}

/// Apply the near-zero numerator guard for the fixed B/C state-space structure.
pub(crate) fn guard_state_space_numerator(
    a12: Real,
    warnings: &mut Vec<ModelWarning>,
) -> Real {
    if a12.abs() < CONTROLLABILITY_THRESHOLD {
        record(
            warnings,
            ModelWarning::UncontrollableNumerator {
                original: a12,
                replacement: MIN_NUMERATOR,
            },
        );
        MIN_NUMERATOR
    } else {
        a12
    }
}

/// Canonical second-order plant. Only constructible through conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPlantModel {
    num: [Real; 3],
    den: [Real; 3],
    wn: Real,
    zeta: Real,
    k: Real,
    warnings: Vec<ModelWarning>,
}

impl CanonicalPlantModel {
    /// Numerator, highest degree first, zero padded to degree 2.
    pub fn num(&self) -> &[Real; 3] {
        &self.num
    }

    /// Denominator, highest degree first. Not necessarily monic.
    pub fn den(&self) -> &[Real; 3] {
        &self.den
    }

    pub fn wn(&self) -> Real {
        self.wn
    }

    pub fn zeta(&self) -> Real {
        self.zeta
    }

    /// Steady-state (DC) gain K.
    pub fn k(&self) -> Real {
        self.k
    }

    /// Guards applied during conversion, in the order they fired.
    pub fn warnings(&self) -> &[ModelWarning] {
        &self.warnings
    }

    pub fn from_parameters(params: &PlantParameterSet) -> Self {
        let mut warnings = Vec::new();
        match *params {
            PlantParameterSet::TimeConstant { tau, k } => {
                let tau = if tau < MIN_TIME_CONSTANT {
                    record(
                        &mut warnings,
                        ModelWarning::TimeConstantFloored {
                            original: tau,
                            replacement: MIN_TIME_CONSTANT,
                        },
                    );
                    MIN_TIME_CONSTANT
                } else {
                    tau
                };
                let wn = 1.0 / tau;
                Self::standard(wn, 1.0, k, warnings)
            }
            PlantParameterSet::NaturalFrequency { wn, zeta, k } => {
                let wn = if wn < MIN_NATURAL_FREQUENCY {
                    record(
                        &mut warnings,
                        ModelWarning::NaturalFrequencyFloored {
                            original: wn,
                            replacement: MIN_NATURAL_FREQUENCY,
                        },
                    );
                    MIN_NATURAL_FREQUENCY
                } else {
                    wn
                };
                let zeta = if zeta < MIN_DAMPING_RATIO {
                    record(
                        &mut warnings,
                        ModelWarning::DampingFloored {
                            original: zeta,
                            replacement: MIN_DAMPING_RATIO,
                        },
                    );
                    MIN_DAMPING_RATIO
                } else {
                    zeta
                };
                Self::standard(wn, zeta, k, warnings)
            }
            PlantParameterSet::Ode { a2, a1, a0, b } => Self::polynomial(a2, a1, a0, b, warnings),
            PlantParameterSet::Laplace { b0, a2, a1, a0 } => {
                Self::polynomial(a2, a1, a0, b0, warnings)
            }
            PlantParameterSet::StateSpace { a11, a12, a21, a22 } => {
                let trace = a11 + a22;
                let det = a11 * a22 - a12 * a21;
                let gain = guard_state_space_numerator(a12, &mut warnings);
                let (wn, zeta) = if det > 0.0 {
                    let wn = det.sqrt();
                    (wn, -trace / (2.0 * wn))
                } else {
                    record(
                        &mut warnings,
                        ModelWarning::NoNaturalFrequency { wn_squared: det },
                    );
                    (1.0, 1.0)
                };
                let k = dc_gain_or_unity(gain, det, &mut warnings);
                Self {
                    num: [0.0, 0.0, gain],
                    den: [1.0, -trace, det],
                    wn,
                    zeta,
                    k,
                    warnings,
                }
            }
        }
    }

    /// Monic standard form from (ωn, ζ, K).
    fn standard(wn: Real, zeta: Real, k: Real, warnings: Vec<ModelWarning>) -> Self {
        let wn2 = wn * wn;
        Self {
            num: [0.0, 0.0, k * wn2],
            den: [1.0, 2.0 * zeta * wn, wn2],
            wn,
            zeta,
            k,
            warnings,
        }
    }

    /// `gain / (a2·s² + a1·s + a0)`, passed through without normalization.
    fn polynomial(
        a2: Real,
        a1: Real,
        a0: Real,
        gain: Real,
        mut warnings: Vec<ModelWarning>,
    ) -> Self {
        let a2 = if a2.abs() < MIN_LEADING_COEFFICIENT {
            record(
                &mut warnings,
                ModelWarning::LeadingCoefficientFloored {
                    original: a2,
                    replacement: MIN_LEADING_COEFFICIENT,
                },
            );
            MIN_LEADING_COEFFICIENT
        } else {
            a2
        };

        let wn_squared = a0 / a2;
        let (wn, zeta) = if wn_squared > 0.0 {
            let wn = wn_squared.sqrt();
            // a1 / (2·a2·ωn) equals a1 / (2·√(a2·a0)) and keeps the sign right
            // when a2 and a0 are both negative.
            (wn, a1 / (2.0 * a2 * wn))
        } else {
            record(&mut warnings, ModelWarning::NoNaturalFrequency { wn_squared });
            (1.0, 1.0)
        };
        let k = dc_gain_or_unity(gain, a0, &mut warnings);

        Self {
            num: [0.0, 0.0, gain],
            den: [a2, a1, a0],
            wn,
            zeta,
            k,
            warnings,
        }
    }

    /// Express these dynamics in another method's parameter vector.
    pub fn to_method(&self, method: PlantMethod) -> Vec<Real> {
        from_canonical(self.wn, self.zeta, self.k, method)
    }
}

fn dc_gain_or_unity(gain: Real, constant_term: Real, warnings: &mut Vec<ModelWarning>) -> Real {
    if constant_term.abs() > DEGENERATE_THRESHOLD {
        gain / constant_term
    } else {
        record(warnings, ModelWarning::UndefinedDcGain { constant_term });
        1.0
    }
}

/// Convert an ordered parameter vector of `method` to the canonical form.
///
/// Fails only when the vector is malformed (wrong length or non-finite).
pub fn to_canonical(values: &[Real], method: PlantMethod) -> ModelResult<CanonicalPlantModel> {
    let params = PlantParameterSet::from_values(method, values)?;
    Ok(CanonicalPlantModel::from_parameters(&params))
}

/// Parameter vector of `method` reproducing (ωn, ζ, K).
///
/// Round-trip fidelity:
/// - method 1: `[1/ωn, K]`; τ comes back within a few ULP since `1/(1/τ)`
///   rounds twice (ζ is ignored, method 1 is always critically damped)
/// - method 2: `[ωn, ζ, K]`, exact
/// - method 3: `[1, 2ζωn, ωn², K·ωn²]`, a2 normalized to 1
/// - method 4: `[K·ωn², 1, 2ζωn, ωn²]`, a2 normalized to 1
/// - method 5: `A = [[0, K·ωn²], [-1/K, -2ζωn]]`, so trace, determinant and
///   A12 reproduce ζ, ωn and K; for K ≈ 0 the gain cannot be encoded and the
///   companion matrix `[[0, 1], [-ωn², -2ζωn]]` is used instead
pub fn from_canonical(wn: Real, zeta: Real, k: Real, method: PlantMethod) -> Vec<Real> {
    let wn2 = wn * wn;
    match method {
        PlantMethod::TimeConstant => vec![1.0 / wn.max(MIN_NATURAL_FREQUENCY), k],
        PlantMethod::NaturalFrequency => vec![wn, zeta, k],
        PlantMethod::Ode => vec![1.0, 2.0 * zeta * wn, wn2, k * wn2],
        PlantMethod::Laplace => vec![k * wn2, 1.0, 2.0 * zeta * wn, wn2],
        PlantMethod::StateSpace => {
            let a12 = k * wn2;
            if a12.abs() < CONTROLLABILITY_THRESHOLD || k.abs() < DEGENERATE_THRESHOLD {
                vec![0.0, 1.0, -wn2, -2.0 * zeta * wn]
            } else {
                vec![0.0, a12, -1.0 / k, -2.0 * zeta * wn]
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn within_ulps(a: Real, b: Real, ulps: Real) -> bool {
        (a - b).abs() <= ulps * Real::EPSILON * a.abs().max(b.abs())
    }

    proptest! {
        #[test]
        fn natural_frequency_is_identity(
            wn in 1e-3..1e3_f64,
            zeta in MIN_DAMPING_RATIO..5.0_f64,
            k in -100.0..100.0_f64,
        ) {
            let plant = to_canonical(&[wn, zeta, k], PlantMethod::NaturalFrequency).unwrap();
            prop_assert_eq!(plant.wn(), wn);
            prop_assert_eq!(plant.zeta(), zeta);
            prop_assert_eq!(plant.k(), k);
            prop_assert!(plant.warnings().is_empty());
            let back = from_canonical(
                plant.wn(),
                plant.zeta(),
                plant.k(),
                PlantMethod::NaturalFrequency,
            );
            prop_assert_eq!(back, vec![wn, zeta, k]);
        }

        #[test]
        fn time_constant_round_trips(tau in 1e-3..1e3_f64, k in -100.0..100.0_f64) {
            let plant = to_canonical(&[tau, k], PlantMethod::TimeConstant).unwrap();
            let back = from_canonical(plant.wn(), plant.zeta(), plant.k(), PlantMethod::TimeConstant);
            prop_assert_eq!(back.len(), 2);
            prop_assert!(within_ulps(back[0], tau, 2.0), "{} != {}", back[0], tau);
            prop_assert_eq!(back[1], k);
        }
    }
}
