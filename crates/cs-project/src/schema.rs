//! Analysis request schema definitions.

use cs_core::{CoreResult, SweepDefinition, SweepKind};
use cs_model::{ControllerModel, PlantParameterSet};
use serde::{Deserialize, Serialize};

use crate::migrate::LATEST_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub version: u32,
    pub name: String,
    /// Tagged by `method`.
    pub plant: PlantParameterSet,
    /// Tagged by `type`; open loop when absent.
    #[serde(default)]
    pub controller: ControllerModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FrequencySweepDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeGridDef>,
}

impl Default for AnalysisRequest {
    /// Runnable request built from the parameter table defaults.
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: "Default analysis".to_string(),
            plant: PlantParameterSet::NaturalFrequency {
                wn: 5.0,
                zeta: 0.7,
                k: 1.0,
            },
            controller: ControllerModel::None,
            frequency: None,
            time: None,
        }
    }
}

/// Logarithmic Bode grid override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrequencySweepDef {
    pub start_rad_s: f64,
    pub end_rad_s: f64,
    #[serde(default = "default_frequency_points")]
    pub points: usize,
}

impl FrequencySweepDef {
    pub fn to_sweep(&self) -> CoreResult<SweepDefinition> {
        SweepDefinition::new(
            self.start_rad_s,
            self.end_rad_s,
            self.points,
            SweepKind::Logarithmic,
        )
    }
}

fn default_frequency_points() -> usize {
    300
}

/// Time grid override. Without `end_s` the horizon is picked from the poles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeGridDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_s: Option<f64>,
    #[serde(default = "default_time_points")]
    pub points: usize,
}

impl Default for TimeGridDef {
    fn default() -> Self {
        Self {
            end_s: None,
            points: default_time_points(),
        }
    }
}

fn default_time_points() -> usize {
    1000
}
