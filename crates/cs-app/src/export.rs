//! Series export as CSV, full outcome as JSON.

use std::fmt::{self, Write};
use std::path::Path;

use crate::analysis_service::AnalysisOutcome;
use crate::error::{AppError, AppResult};

/// Which series to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Step,
    Impulse,
    /// Step and impulse side by side on the shared time grid.
    Time,
    Bode,
}

impl SeriesKind {
    pub fn from_name(name: &str) -> AppResult<Self> {
        match name {
            "step" => Ok(SeriesKind::Step),
            "impulse" => Ok(SeriesKind::Impulse),
            "time" => Ok(SeriesKind::Time),
            "bode" => Ok(SeriesKind::Bode),
            other => Err(AppError::InvalidInput(format!(
                "unknown series '{}' (expected step, impulse, time or bode)",
                other
            ))),
        }
    }
}

pub fn series_csv(outcome: &AnalysisOutcome, kind: SeriesKind) -> String {
    let mut csv = String::new();
    // Writing into a String cannot fail.
    let _ = write_series(&mut csv, outcome, kind);
    csv
}

fn write_series(out: &mut String, outcome: &AnalysisOutcome, kind: SeriesKind) -> fmt::Result {
    match kind {
        SeriesKind::Step => {
            writeln!(out, "time_s,step")?;
            for (t, y) in outcome.step.time.iter().zip(&outcome.step.value) {
                writeln!(out, "{},{}", t, y)?;
            }
        }
        SeriesKind::Impulse => {
            writeln!(out, "time_s,impulse")?;
            for (t, y) in outcome.impulse.time.iter().zip(&outcome.impulse.value) {
                writeln!(out, "{},{}", t, y)?;
            }
        }
        SeriesKind::Time => {
            writeln!(out, "time_s,step,impulse")?;
            let rows = outcome
                .step
                .time
                .iter()
                .zip(&outcome.step.value)
                .zip(&outcome.impulse.value);
            for ((t, s), i) in rows {
                writeln!(out, "{},{},{}", t, s, i)?;
            }
        }
        SeriesKind::Bode => {
            writeln!(out, "omega_rad_s,magnitude_db,phase_deg")?;
            for sample in outcome.frequency.samples() {
                writeln!(
                    out,
                    "{},{},{}",
                    sample.omega, sample.magnitude_db, sample.phase_deg
                )?;
            }
        }
    }
    Ok(())
}

pub fn outcome_json(outcome: &AnalysisOutcome) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Write `content` to `path`, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_service::analyze;
    use cs_project::schema::AnalysisRequest;

    #[test]
    fn csv_headers_and_row_counts() {
        let outcome = analyze(&AnalysisRequest::default()).unwrap();

        let step = series_csv(&outcome, SeriesKind::Step);
        assert!(step.starts_with("time_s,step\n0,0\n"));
        assert_eq!(step.lines().count(), 1 + outcome.step.len());

        let time = series_csv(&outcome, SeriesKind::Time);
        assert_eq!(time.lines().next(), Some("time_s,step,impulse"));
        assert_eq!(time.lines().nth(1).unwrap().split(',').count(), 3);

        let impulse = series_csv(&outcome, SeriesKind::Impulse);
        assert_eq!(impulse.lines().count(), 1 + outcome.impulse.len());
        assert!(impulse.ends_with('\n'));

        let bode = series_csv(&outcome, SeriesKind::Bode);
        assert_eq!(bode.lines().count(), 301);
        assert_eq!(bode.lines().next(), Some("omega_rad_s,magnitude_db,phase_deg"));
    }

    #[test]
    fn json_contains_metrics() {
        let outcome = analyze(&AnalysisRequest::default()).unwrap();
        let json = outcome_json(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["performance"]["is_stable"], true);
        assert_eq!(value["regime"], "underdamped");
        assert_eq!(value["performance"]["poles"].as_array().unwrap().len(), 2);
        assert_eq!(value["performance"]["zeros"].as_array().unwrap().len(), 0);
        assert_eq!(value["fingerprint"], outcome.fingerprint);
    }

    #[test]
    fn series_names() {
        assert_eq!(SeriesKind::from_name("bode").unwrap(), SeriesKind::Bode);
        assert!(SeriesKind::from_name("nyquist").is_err());
    }

    #[test]
    fn writes_into_new_directory() {
        let dir = std::env::temp_dir().join("cs_app_export_test");
        let path = dir.join("nested").join("out.csv");
        write_output(&path, "a,b\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }
}
