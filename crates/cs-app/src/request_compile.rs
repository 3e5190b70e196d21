//! Request compilation: resolve file defaults into pipeline inputs.

use cs_core::SweepDefinition;
use cs_model::{CanonicalPlantModel, ControllerModel, PlantParameterSet};
use cs_project::schema::{AnalysisRequest, TimeGridDef};

use crate::error::AppResult;

/// Everything the analysis pipeline needs from a request.
#[derive(Debug, Clone)]
pub struct CompiledRequest {
    pub plant_params: PlantParameterSet,
    pub plant: CanonicalPlantModel,
    pub controller: ControllerModel,
    pub frequency: SweepDefinition,
    pub time: TimeGridDef,
}

pub fn compile_request(request: &AnalysisRequest) -> AppResult<CompiledRequest> {
    // Deserialized values skip the vector constructor, so re-check them.
    let plant_params =
        PlantParameterSet::from_values(request.plant.method(), &request.plant.to_values())?;
    let controller = ControllerModel::from_values(
        request.controller.kind(),
        &request.controller.to_values(),
    )?;
    let plant = CanonicalPlantModel::from_parameters(&plant_params);
    let frequency = match &request.frequency {
        Some(def) => def.to_sweep()?,
        None => SweepDefinition::default_frequency(),
    };
    let time = request.time.unwrap_or_default();

    Ok(CompiledRequest {
        plant_params,
        plant,
        controller,
        frequency,
        time,
    })
}
