//! Parameter tables for plant methods and controllers.
//!
//! Each entry describes one editable value: its key in the request file, a
//! display label, the slider range and increment, and the default used when a
//! value is missing or unparseable. Entries are listed in parameter vector
//! order.

use cs_model::{ControllerKind, ControllerModel, ModelResult, PlantMethod, PlantParameterSet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl ParameterSpec {
    const fn new(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            min,
            max,
            default,
            step,
        }
    }

    /// Parse user text, falling back to the default when it is not a finite
    /// number.
    pub fn parse_or_default(&self, text: &str) -> f64 {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => self.default,
        }
    }

    /// Limit `value` to the slider range.
    pub fn clamp_to_range(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const TIME_CONSTANT: &[ParameterSpec] = &[
    ParameterSpec::new("tau", "Time Constant (τ)", 0.1, 10.0, 1.0, 0.1),
    ParameterSpec::new("k", "DC Gain (K)", 0.1, 10.0, 1.0, 0.1),
];

pub const NATURAL_FREQUENCY: &[ParameterSpec] = &[
    ParameterSpec::new("wn", "Natural Frequency (ωn)", 0.1, 50.0, 5.0, 0.5),
    ParameterSpec::new("zeta", "Damping Ratio (ζ)", 0.01, 2.0, 0.7, 0.05),
    ParameterSpec::new("k", "DC Gain (K)", 0.1, 10.0, 1.0, 0.1),
];

pub const ODE: &[ParameterSpec] = &[
    ParameterSpec::new("a2", "a2 (coefficient of y″)", 0.0, 10.0, 1.0, 0.1),
    ParameterSpec::new("a1", "a1 (coefficient of y′)", 0.0, 50.0, 7.0, 0.1),
    ParameterSpec::new("a0", "a0 (coefficient of y)", 0.0, 500.0, 25.0, 0.5),
    ParameterSpec::new("b", "b (input coefficient)", 0.0, 100.0, 25.0, 0.5),
];

pub const LAPLACE: &[ParameterSpec] = &[
    ParameterSpec::new("b0", "b0 (numerator)", 0.0, 100.0, 25.0, 0.5),
    ParameterSpec::new("a2", "a2 (s² coefficient)", 0.01, 10.0, 1.0, 0.1),
    ParameterSpec::new("a1", "a1 (s coefficient)", 0.0, 50.0, 7.0, 0.1),
    ParameterSpec::new("a0", "a0 (constant)", 0.0, 500.0, 25.0, 0.5),
];

pub const STATE_SPACE: &[ParameterSpec] = &[
    ParameterSpec::new("a11", "A11", -50.0, 50.0, 0.0, 0.5),
    ParameterSpec::new("a12", "A12", -50.0, 50.0, 1.0, 0.5),
    ParameterSpec::new("a21", "A21", -50.0, 50.0, -25.0, 0.5),
    ParameterSpec::new("a22", "A22", -50.0, 50.0, -7.0, 0.5),
];

pub const PID: &[ParameterSpec] = &[
    ParameterSpec::new("kp", "Proportional Gain (Kp)", 0.0, 100.0, 1.0, 0.1),
    ParameterSpec::new("ki", "Integral Gain (Ki)", 0.0, 50.0, 0.0, 0.1),
    ParameterSpec::new("kd", "Derivative Gain (Kd)", 0.0, 20.0, 0.0, 0.1),
];

pub const STATE_FEEDBACK: &[ParameterSpec] = &[
    ParameterSpec::new("k1", "State Gain K1", -100.0, 100.0, 1.0, 0.5),
    ParameterSpec::new("k2", "State Gain K2", -100.0, 100.0, 1.0, 0.5),
];

pub fn plant_specs(method: PlantMethod) -> &'static [ParameterSpec] {
    match method {
        PlantMethod::TimeConstant => TIME_CONSTANT,
        PlantMethod::NaturalFrequency => NATURAL_FREQUENCY,
        PlantMethod::Ode => ODE,
        PlantMethod::Laplace => LAPLACE,
        PlantMethod::StateSpace => STATE_SPACE,
    }
}

/// The open loop has no parameters.
pub fn controller_specs(kind: ControllerKind) -> &'static [ParameterSpec] {
    match kind {
        ControllerKind::None => &[],
        ControllerKind::Pid => PID,
        ControllerKind::StateFeedback => STATE_FEEDBACK,
    }
}

/// Table for a request-file tag, plant methods first.
pub fn specs_for_tag(tag: &str) -> Option<&'static [ParameterSpec]> {
    PlantMethod::from_tag(tag)
        .map(plant_specs)
        .or_else(|| ControllerKind::from_tag(tag).map(controller_specs))
}

fn defaults(specs: &[ParameterSpec]) -> Vec<f64> {
    specs.iter().map(|spec| spec.default).collect()
}

/// Plant of the given method with every parameter at its table default.
pub fn default_plant(method: PlantMethod) -> ModelResult<PlantParameterSet> {
    PlantParameterSet::from_values(method, &defaults(plant_specs(method)))
}

pub fn default_controller(kind: ControllerKind) -> ModelResult<ControllerModel> {
    ControllerModel::from_values(kind, &defaults(controller_specs(kind)))
}

/// Parse one text field per spec, replacing bad entries with defaults.
pub fn parse_all(specs: &[ParameterSpec], texts: &[&str]) -> Vec<f64> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| match texts.get(i) {
            Some(text) => spec.parse_or_default(text),
            None => spec.default,
        })
        .collect()
}
