//! Request validation logic.
//!
//! Only malformed input is rejected. Out-of-range but finite plant values are
//! legal; the model layer guards degenerate cases itself.

use crate::schema::{AnalysisRequest, FrequencySweepDef, TimeGridDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_request(request: &AnalysisRequest) -> Result<(), ValidationError> {
    if request.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: request.version,
        });
    }

    check_finite(
        "plant",
        request.plant.method().field_names(),
        &request.plant.to_values(),
    )?;
    check_finite(
        "controller",
        request.controller.kind().field_names(),
        &request.controller.to_values(),
    )?;

    if let Some(frequency) = &request.frequency {
        validate_frequency(frequency)?;
    }
    if let Some(time) = &request.time {
        validate_time(time)?;
    }

    Ok(())
}

fn check_finite(
    section: &str,
    names: &[&str],
    values: &[f64],
) -> Result<(), ValidationError> {
    for (name, value) in names.iter().zip(values) {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", section, name),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_frequency(def: &FrequencySweepDef) -> Result<(), ValidationError> {
    if def.end_rad_s <= def.start_rad_s {
        return Err(ValidationError::InvalidValue {
            field: "frequency.end_rad_s".to_string(),
            value: def.end_rad_s.to_string(),
            reason: format!("must exceed start_rad_s ({})", def.start_rad_s),
        });
    }
    def.to_sweep()
        .map_err(|e| ValidationError::InvalidValue {
            field: "frequency".to_string(),
            value: format!("{}..{} ({} points)", def.start_rad_s, def.end_rad_s, def.points),
            reason: e.to_string(),
        })
        .map(|_| ())
}

fn validate_time(def: &TimeGridDef) -> Result<(), ValidationError> {
    if def.points < 2 {
        return Err(ValidationError::InvalidValue {
            field: "time.points".to_string(),
            value: def.points.to_string(),
            reason: "need at least 2 samples".to_string(),
        });
    }
    if let Some(end) = def.end_s
        && !(end.is_finite() && end > 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "time.end_s".to_string(),
            value: end.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::{ControllerModel, PlantParameterSet};

    #[test]
    fn default_request_is_valid() {
        validate_request(&AnalysisRequest::default()).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let request = AnalysisRequest {
            version: 99,
            ..AnalysisRequest::default()
        };
        assert!(matches!(
            validate_request(&request),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn non_finite_gain_rejected() {
        let request = AnalysisRequest {
            controller: ControllerModel::Pid {
                kp: 1.0,
                ki: f64::NAN,
                kd: 0.0,
            },
            ..AnalysisRequest::default()
        };
        let err = validate_request(&request).unwrap_err();
        assert!(err.to_string().contains("controller.ki"));
    }

    #[test]
    fn out_of_range_plant_is_accepted() {
        let request = AnalysisRequest {
            plant: PlantParameterSet::NaturalFrequency {
                wn: 0.0,
                zeta: -3.0,
                k: 1000.0,
            },
            ..AnalysisRequest::default()
        };
        validate_request(&request).unwrap();
    }

    #[test]
    fn bad_grids_rejected() {
        let reversed = AnalysisRequest {
            frequency: Some(FrequencySweepDef {
                start_rad_s: 10.0,
                end_rad_s: 1.0,
                points: 100,
            }),
            ..AnalysisRequest::default()
        };
        assert!(validate_request(&reversed).is_err());

        let non_positive = AnalysisRequest {
            frequency: Some(FrequencySweepDef {
                start_rad_s: 0.0,
                end_rad_s: 1.0,
                points: 100,
            }),
            ..AnalysisRequest::default()
        };
        assert!(validate_request(&non_positive).is_err());

        let short = AnalysisRequest {
            time: Some(TimeGridDef {
                end_s: Some(5.0),
                points: 1,
            }),
            ..AnalysisRequest::default()
        };
        assert!(validate_request(&short).is_err());

        let negative = AnalysisRequest {
            time: Some(TimeGridDef {
                end_s: Some(-1.0),
                points: 10,
            }),
            ..AnalysisRequest::default()
        };
        assert!(validate_request(&negative).is_err());
    }
}
