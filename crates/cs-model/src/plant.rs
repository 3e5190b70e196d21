//! Plant parameterizations.
//!
//! A second-order plant can be described five ways. Each method carries its
//! own named fields; the ordered-vector form exists only at the boundary
//! where values arrive from sliders, text fields or files.

use std::fmt;

use cs_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{ModelResult, ValidationError};

/// The five plant parameterizations, numbered as presented to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantMethod {
    /// τ, K
    TimeConstant,
    /// ωn, ζ, K
    NaturalFrequency,
    /// a2·y″ + a1·y′ + a0·y = b·u
    Ode,
    /// b0 / (a2·s² + a1·s + a0)
    Laplace,
    /// ẋ = A·x + B·u, y = C·x with B = [0; 1], C = [1, 0]
    StateSpace,
}

/// How faithfully `from_canonical(to_canonical(v))` reproduces `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundTripFidelity {
    /// Original values come back (up to floating point rounding).
    Exact,
    /// ωn, ζ and K survive but the raw values are renormalized.
    DynamicsOnly,
}

impl PlantMethod {
    pub const ALL: [PlantMethod; 5] = [
        PlantMethod::TimeConstant,
        PlantMethod::NaturalFrequency,
        PlantMethod::Ode,
        PlantMethod::Laplace,
        PlantMethod::StateSpace,
    ];

    /// 1-based method number.
    pub fn number(self) -> usize {
        match self {
            Self::TimeConstant => 1,
            Self::NaturalFrequency => 2,
            Self::Ode => 3,
            Self::Laplace => 4,
            Self::StateSpace => 5,
        }
    }

    pub fn from_number(index: usize) -> ModelResult<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ValidationError::UnknownMethod { index })
    }

    /// Key used for this method in request files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::TimeConstant => "time_constant",
            Self::NaturalFrequency => "natural_frequency",
            Self::Ode => "ode",
            Self::Laplace => "laplace",
            Self::StateSpace => "state_space",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }

    /// Number of values in the ordered parameter vector.
    pub fn arity(self) -> usize {
        self.field_names().len()
    }

    /// Field names in vector order.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::TimeConstant => &["tau", "k"],
            Self::NaturalFrequency => &["wn", "zeta", "k"],
            Self::Ode => &["a2", "a1", "a0", "b"],
            Self::Laplace => &["b0", "a2", "a1", "a0"],
            Self::StateSpace => &["a11", "a12", "a21", "a22"],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::TimeConstant => "Time Constant (1st Order)",
            Self::NaturalFrequency => "Natural Frequency & Damping",
            Self::Ode => "ODE Coefficients",
            Self::Laplace => "Laplace Transfer Function",
            Self::StateSpace => "State Space Matrix",
        }
    }

    /// Methods 3-5 renormalize (a2 = 1, companion-like A), so only the
    /// dynamics survive a trip through the canonical form.
    pub fn round_trip_fidelity(self) -> RoundTripFidelity {
        match self {
            Self::TimeConstant | Self::NaturalFrequency => RoundTripFidelity::Exact,
            Self::Ode | Self::Laplace | Self::StateSpace => RoundTripFidelity::DynamicsOnly,
        }
    }
}

impl fmt::Display for PlantMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method {}", self.number())
    }
}

/// Plant parameters, one variant per method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PlantParameterSet {
    TimeConstant {
        tau: Real,
        k: Real,
    },
    NaturalFrequency {
        wn: Real,
        zeta: Real,
        k: Real,
    },
    Ode {
        a2: Real,
        a1: Real,
        a0: Real,
        b: Real,
    },
    Laplace {
        b0: Real,
        a2: Real,
        a1: Real,
        a0: Real,
    },
    StateSpace {
        a11: Real,
        a12: Real,
        a21: Real,
        a22: Real,
    },
}

impl PlantParameterSet {
    /// Build from an ordered vector, enforcing the method's exact arity.
    pub fn from_values(method: PlantMethod, values: &[Real]) -> ModelResult<Self> {
        if values.len() != method.arity() {
            return Err(ValidationError::Arity {
                subject: method.to_string(),
                expected: method.arity(),
                got: values.len(),
            });
        }
        for (field, value) in method.field_names().iter().copied().zip(values) {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    field,
                    value: *value,
                });
            }
        }

        let v = values;
        Ok(match method {
            PlantMethod::TimeConstant => Self::TimeConstant { tau: v[0], k: v[1] },
            PlantMethod::NaturalFrequency => Self::NaturalFrequency {
                wn: v[0],
                zeta: v[1],
                k: v[2],
            },
            PlantMethod::Ode => Self::Ode {
                a2: v[0],
                a1: v[1],
                a0: v[2],
                b: v[3],
            },
            PlantMethod::Laplace => Self::Laplace {
                b0: v[0],
                a2: v[1],
                a1: v[2],
                a0: v[3],
            },
            PlantMethod::StateSpace => Self::StateSpace {
                a11: v[0],
                a12: v[1],
                a21: v[2],
                a22: v[3],
            },
        })
    }

    pub fn method(&self) -> PlantMethod {
        match self {
            Self::TimeConstant { .. } => PlantMethod::TimeConstant,
            Self::NaturalFrequency { .. } => PlantMethod::NaturalFrequency,
            Self::Ode { .. } => PlantMethod::Ode,
            Self::Laplace { .. } => PlantMethod::Laplace,
            Self::StateSpace { .. } => PlantMethod::StateSpace,
        }
    }

    /// Ordered vector form, inverse of [`PlantParameterSet::from_values`].
    pub fn to_values(&self) -> Vec<Real> {
        match *self {
            Self::TimeConstant { tau, k } => vec![tau, k],
            Self::NaturalFrequency { wn, zeta, k } => vec![wn, zeta, k],
            Self::Ode { a2, a1, a0, b } => vec![a2, a1, a0, b],
            Self::Laplace { b0, a2, a1, a0 } => vec![b0, a2, a1, a0],
            Self::StateSpace { a11, a12, a21, a22 } => vec![a11, a12, a21, a22],
        }
    }

    /// State matrix when the plant is given in state-space form.
    pub fn state_matrix(&self) -> Option<[[Real; 2]; 2]> {
        match *self {
            Self::StateSpace { a11, a12, a21, a22 } => Some([[a11, a12], [a21, a22]]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_numbers_round_trip() {
        for method in PlantMethod::ALL {
            assert_eq!(PlantMethod::from_number(method.number()).unwrap(), method);
        }
        assert!(PlantMethod::from_number(0).is_err());
        assert!(PlantMethod::from_number(6).is_err());
    }

    #[test]
    fn tags_match_serde_names() {
        for method in PlantMethod::ALL {
            assert_eq!(PlantMethod::from_tag(method.tag()), Some(method));
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.tag()));
        }
        assert_eq!(PlantMethod::from_tag("pid"), None);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = PlantParameterSet::from_values(PlantMethod::StateSpace, &[0.0, 1.0, -25.0])
            .unwrap_err();
        assert_eq!(format!("{err}"), "method 5 requires 4 values, got 3");

        // Extra values are not silently dropped either.
        assert!(PlantParameterSet::from_values(PlantMethod::TimeConstant, &[1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = PlantParameterSet::from_values(PlantMethod::NaturalFrequency, &[5.0, f64::NAN, 1.0])
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonFinite { field: "zeta", .. }));
    }

    #[test]
    fn vector_form_round_trips() {
        let values = [1.0, 7.0, 25.0, 25.0];
        let set = PlantParameterSet::from_values(PlantMethod::Ode, &values).unwrap();
        assert_eq!(set.method(), PlantMethod::Ode);
        assert_eq!(set.to_values(), values.to_vec());
        assert!(set.state_matrix().is_none());
    }

    #[test]
    fn fidelity_per_method() {
        assert_eq!(
            PlantMethod::TimeConstant.round_trip_fidelity(),
            RoundTripFidelity::Exact
        );
        assert_eq!(
            PlantMethod::StateSpace.round_trip_fidelity(),
            RoundTripFidelity::DynamicsOnly
        );
    }
}
