//! Analysis pipeline: request → closed loop → responses, Bode data, metrics.

use std::path::Path;

use cs_analysis::{
    bode, evaluate, impulse_response, step_response, time_grid, Crossovers, DampingRegime,
    FrequencyResponse, PerformanceSummary, SecondOrderParams, TimeResponse,
};
use cs_core::sweep::linspace;
use cs_model::{synthesize, CanonicalPlantModel, ClosedLoopModel, ModelWarning};
use cs_project::schema::AnalysisRequest;
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::AppResult;
use crate::request_compile::{compile_request, CompiledRequest};

/// Full result of analyzing one request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub name: String,
    /// SHA-256 of the serialized request.
    pub fingerprint: String,
    pub plant: CanonicalPlantModel,
    pub closed_loop: ClosedLoopModel,
    /// (ωn, ζ, K) driving the analytic responses.
    pub equivalent: SecondOrderParams,
    pub regime: DampingRegime,
    pub performance: PerformanceSummary,
    pub step: TimeResponse,
    pub impulse: TimeResponse,
    pub frequency: FrequencyResponse,
    pub crossovers: Crossovers,
    /// Guards applied by plant conversion and synthesis.
    pub warnings: Vec<ModelWarning>,
}

/// Content hash identifying a request.
pub fn request_fingerprint(request: &AnalysisRequest) -> String {
    let mut hasher = Sha256::new();
    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn analyze(request: &AnalysisRequest) -> AppResult<AnalysisOutcome> {
    let compiled = compile_request(request)?;
    debug!(
        name = %request.name,
        plant = %compiled.plant_params.method(),
        controller = %compiled.controller.kind(),
        "compiled request"
    );
    Ok(run_pipeline(request, compiled))
}

/// Load, migrate, validate and analyze a request file.
pub fn analyze_file(path: &Path) -> AppResult<(AnalysisRequest, AnalysisOutcome)> {
    let request = cs_project::load(path)?;
    let outcome = analyze(&request)?;
    Ok((request, outcome))
}

/// Analyze independent requests in parallel. Results keep input order.
pub fn analyze_batch(requests: &[AnalysisRequest]) -> Vec<AppResult<AnalysisOutcome>> {
    debug!(count = requests.len(), "batch analysis");
    requests.par_iter().map(analyze).collect()
}

fn run_pipeline(request: &AnalysisRequest, compiled: CompiledRequest) -> AnalysisOutcome {
    let CompiledRequest {
        plant_params,
        plant,
        controller,
        frequency,
        time,
    } = compiled;

    let closed_loop = synthesize(&plant, &controller, &plant_params);
    debug!(num = ?closed_loop.num(), den = ?closed_loop.den(), "closed loop");

    let guarded = closed_loop.guarded_for_analysis();
    let performance = evaluate(guarded.den(), guarded.num());
    debug!(
        stable = performance.is_stable,
        poles = performance.poles.len(),
        "stability evaluated"
    );

    let equivalent = SecondOrderParams::from_closed_loop(&closed_loop);
    let regime = equivalent.regime();
    let t = match time.end_s {
        Some(end) => linspace(0.0, end, time.points),
        None => time_grid(&performance.poles, time.points),
    };
    let step = step_response(equivalent, &t);
    let impulse = impulse_response(equivalent, &t);
    debug!(?regime, samples = t.len(), "time responses");

    let frequency = bode(guarded.num(), guarded.den(), &frequency.generate_points());
    let crossovers = frequency.crossovers();
    debug!(bandwidth = ?crossovers.bandwidth, "frequency response");

    let warnings = plant
        .warnings()
        .iter()
        .chain(closed_loop.warnings())
        .copied()
        .collect();

    AnalysisOutcome {
        name: request.name.clone(),
        fingerprint: request_fingerprint(request),
        plant,
        closed_loop,
        equivalent,
        regime,
        performance,
        step,
        impulse,
        frequency,
        crossovers,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::{ControllerModel, PlantParameterSet};
    use cs_project::schema::TimeGridDef;

    #[test]
    fn default_request_pipeline() {
        let outcome = analyze(&AnalysisRequest::default()).unwrap();
        assert!(outcome.performance.is_stable);
        assert_eq!(outcome.regime, DampingRegime::Underdamped);
        assert_eq!(outcome.step.len(), 1000);
        assert_eq!(outcome.frequency.len(), 300);
        assert!(outcome.warnings.is_empty());
        assert!((outcome.equivalent.k - 1.0).abs() < 1e-12);
        assert_eq!(outcome.fingerprint.len(), 64);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = AnalysisRequest::default();
        let mut b = a.clone();
        assert_eq!(request_fingerprint(&a), request_fingerprint(&b));
        b.controller = ControllerModel::Pid {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        };
        assert_ne!(request_fingerprint(&a), request_fingerprint(&b));
    }

    #[test]
    fn explicit_time_grid_is_used() {
        let request = AnalysisRequest {
            time: Some(TimeGridDef {
                end_s: Some(2.0),
                points: 21,
            }),
            ..AnalysisRequest::default()
        };
        let outcome = analyze(&request).unwrap();
        assert_eq!(outcome.step.len(), 21);
        assert_eq!(outcome.step.time[20], 2.0);
    }

    #[test]
    fn zero_gain_pid_is_guarded_not_failed() {
        let request = AnalysisRequest {
            controller: ControllerModel::Pid {
                kp: 0.0,
                ki: 0.0,
                kd: 0.0,
            },
            ..AnalysisRequest::default()
        };
        let outcome = analyze(&request).unwrap();
        assert!(!outcome.performance.is_stable);
        assert!(outcome.step.value.iter().all(|v| *v == 0.0));
        assert!(outcome.frequency.magnitude_db.iter().all(|m| m.is_finite()));
    }

    #[test]
    fn uncontrollable_state_space_reports_warning() {
        let request = AnalysisRequest {
            plant: PlantParameterSet::StateSpace {
                a11: -1.0,
                a12: 0.0,
                a21: 1.0,
                a22: -2.0,
            },
            ..AnalysisRequest::default()
        };
        let outcome = analyze(&request).unwrap();
        assert!(
            outcome
                .warnings
                .iter()
                .any(|w| matches!(w, ModelWarning::UncontrollableNumerator { .. }))
        );
        assert!(outcome.step.value.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn batch_keeps_order() {
        let requests: Vec<AnalysisRequest> = [1.0, 2.0, 4.0]
            .iter()
            .map(|&wn| AnalysisRequest {
                plant: PlantParameterSet::NaturalFrequency {
                    wn,
                    zeta: 0.5,
                    k: 1.0,
                },
                ..AnalysisRequest::default()
            })
            .collect();
        let outcomes = analyze_batch(&requests);
        assert_eq!(outcomes.len(), 3);
        for (outcome, wn) in outcomes.iter().zip([1.0, 2.0, 4.0]) {
            let outcome = outcome.as_ref().unwrap();
            assert!((outcome.performance.cl_wn - wn).abs() < 1e-9);
        }
    }
}
