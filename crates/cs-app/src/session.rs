//! Interactive editing session.
//!
//! Front ends mutate the working request only through [`Command`]s so every
//! edit goes through the same parsing and conversion rules. Switching the
//! plant method re-expresses the current dynamics in the new
//! parameterization instead of loading that method's defaults.

use cs_model::{
    CanonicalPlantModel, ControllerKind, ControllerModel, PlantMethod, PlantParameterSet,
};
use cs_project::params::{controller_specs, default_controller, plant_specs, ParameterSpec};
use cs_project::schema::AnalysisRequest;

use crate::analysis_service::{analyze, AnalysisOutcome};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Convert the current plant to another parameterization.
    SetPlantMethod(PlantMethod),
    SetPlantParam { index: usize, value: f64 },
    /// Raw text from an input field; unparseable text falls back to the default.
    SetPlantParamText { index: usize, text: String },
    /// Switch controller type, starting from that type's defaults.
    SetControllerKind(ControllerKind),
    SetControllerParam { index: usize, value: f64 },
    SetControllerParamText { index: usize, text: String },
    Rename(String),
    /// Back to the default request.
    Reset,
}

#[derive(Debug, Clone)]
pub struct Session {
    request: AnalysisRequest,
    history: Vec<Command>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AnalysisRequest::default())
    }
}

impl Session {
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            request,
            history: Vec::new(),
        }
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Commands applied so far, oldest first.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    pub fn plant_method(&self) -> PlantMethod {
        self.request.plant.method()
    }

    pub fn controller_kind(&self) -> ControllerKind {
        self.request.controller.kind()
    }

    pub fn analyze(&self) -> AppResult<AnalysisOutcome> {
        analyze(&self.request)
    }

    pub fn apply(&mut self, command: Command) -> AppResult<()> {
        match &command {
            Command::SetPlantMethod(method) => self.set_plant_method(*method)?,
            Command::SetPlantParam { index, value } => self.set_plant_param(*index, *value)?,
            Command::SetPlantParamText { index, text } => {
                let value = self.plant_spec(*index)?.parse_or_default(text);
                self.set_plant_param(*index, value)?;
            }
            Command::SetControllerKind(kind) => self.set_controller_kind(*kind)?,
            Command::SetControllerParam { index, value } => {
                self.set_controller_param(*index, *value)?
            }
            Command::SetControllerParamText { index, text } => {
                let value = self.controller_spec(*index)?.parse_or_default(text);
                self.set_controller_param(*index, value)?;
            }
            Command::Rename(name) => self.request.name = name.clone(),
            Command::Reset => self.request = AnalysisRequest::default(),
        }
        self.history.push(command);
        Ok(())
    }

    fn set_plant_method(&mut self, method: PlantMethod) -> AppResult<()> {
        if method == self.plant_method() {
            return Ok(());
        }
        let from = self.plant_method();
        let values = CanonicalPlantModel::from_parameters(&self.request.plant).to_method(method);
        tracing::debug!(%from, to = %method, ?values, "plant method switched");
        self.request.plant = PlantParameterSet::from_values(method, &values)?;
        Ok(())
    }

    fn set_plant_param(&mut self, index: usize, value: f64) -> AppResult<()> {
        let method = self.plant_method();
        let mut values = self.request.plant.to_values();
        *values
            .get_mut(index)
            .ok_or_else(|| index_error("plant", index, method.arity()))? = value;
        self.request.plant = PlantParameterSet::from_values(method, &values)?;
        Ok(())
    }

    fn set_controller_kind(&mut self, kind: ControllerKind) -> AppResult<()> {
        if kind == self.controller_kind() {
            return Ok(());
        }
        self.request.controller = default_controller(kind)?;
        Ok(())
    }

    fn set_controller_param(&mut self, index: usize, value: f64) -> AppResult<()> {
        let kind = self.controller_kind();
        let mut values = self.request.controller.to_values();
        *values
            .get_mut(index)
            .ok_or_else(|| index_error("controller", index, kind.arity()))? = value;
        self.request.controller = ControllerModel::from_values(kind, &values)?;
        Ok(())
    }

    fn plant_spec(&self, index: usize) -> AppResult<ParameterSpec> {
        let method = self.plant_method();
        plant_specs(method)
            .get(index)
            .copied()
            .ok_or_else(|| index_error("plant", index, method.arity()))
    }

    fn controller_spec(&self, index: usize) -> AppResult<ParameterSpec> {
        let kind = self.controller_kind();
        controller_specs(kind)
            .get(index)
            .copied()
            .ok_or_else(|| index_error("controller", index, kind.arity()))
    }
}

fn index_error(what: &str, index: usize, arity: usize) -> AppError {
    AppError::InvalidInput(format!(
        "{} parameter index {} out of range (has {})",
        what, index, arity
    ))
}
