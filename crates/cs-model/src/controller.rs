//! Feedback controller models.
//!
//! Provides the controller variants the synthesizer understands:
//! - **None**: open loop, the plant is analyzed as-is
//! - **PID**: C(s) = Kp + Ki/s + Kd·s under unity feedback
//! - **State feedback**: u = -K·x with K = [K1, K2]

use std::fmt;

use cs_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{ModelResult, ValidationError};

/// Controller type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    None,
    Pid,
    StateFeedback,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 3] = [
        ControllerKind::None,
        ControllerKind::Pid,
        ControllerKind::StateFeedback,
    ];

    /// Key used for this controller type in request files.
    pub fn tag(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pid => "pid",
            Self::StateFeedback => "state_feedback",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn arity(self) -> usize {
        self.field_names().len()
    }

    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::None => &[],
            Self::Pid => &["kp", "ki", "kd"],
            Self::StateFeedback => &["k1", "k2"],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pid => "PID Controller",
            Self::StateFeedback => "State Feedback",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Controller configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerModel {
    #[default]
    None,
    Pid {
        /// Proportional gain.
        kp: Real,
        /// Integral gain.
        ki: Real,
        /// Derivative gain.
        kd: Real,
    },
    StateFeedback {
        k1: Real,
        k2: Real,
    },
}

impl ControllerModel {
    /// Build from an ordered gain vector, enforcing the kind's arity.
    pub fn from_values(kind: ControllerKind, values: &[Real]) -> ModelResult<Self> {
        if values.len() != kind.arity() {
            return Err(ValidationError::Arity {
                subject: kind.display_name().to_string(),
                expected: kind.arity(),
                got: values.len(),
            });
        }
        for (field, value) in kind.field_names().iter().copied().zip(values) {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    field,
                    value: *value,
                });
            }
        }
        Ok(match kind {
            ControllerKind::None => Self::None,
            ControllerKind::Pid => Self::Pid {
                kp: values[0],
                ki: values[1],
                kd: values[2],
            },
            ControllerKind::StateFeedback => Self::StateFeedback {
                k1: values[0],
                k2: values[1],
            },
        })
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::None => ControllerKind::None,
            Self::Pid { .. } => ControllerKind::Pid,
            Self::StateFeedback { .. } => ControllerKind::StateFeedback,
        }
    }

    pub fn to_values(&self) -> Vec<Real> {
        match *self {
            Self::None => Vec::new(),
            Self::Pid { kp, ki, kd } => vec![kp, ki, kd],
            Self::StateFeedback { k1, k2 } => vec![k1, k2],
        }
    }

    /// PID compensator as (numerator, denominator): (Kd·s² + Kp·s + Ki) / s.
    pub fn pid_compensator(kp: Real, ki: Real, kd: Real) -> ([Real; 3], [Real; 2]) {
        ([kd, kp, ki], [1.0, 0.0])
    }
}
