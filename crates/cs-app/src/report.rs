//! Plain-text analysis report.

use std::f64::consts::PI;
use std::fmt::Write;

use chrono::{DateTime, Local};
use cs_analysis::{is_complex, RootSet};
use cs_core::{Complex, Real};
use cs_project::params::{controller_specs, plant_specs};
use cs_project::schema::AnalysisRequest;

use crate::analysis_service::AnalysisOutcome;

const RULE_WIDTH: usize = 40;

/// Render the report with the current local time as its timestamp.
pub fn render_report(request: &AnalysisRequest, outcome: &AnalysisOutcome) -> String {
    render_report_at(request, outcome, Local::now())
}

pub fn render_report_at(
    request: &AnalysisRequest,
    outcome: &AnalysisOutcome,
    generated: DateTime<Local>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, request, outcome, generated);
    out
}

fn write_report(
    out: &mut String,
    request: &AnalysisRequest,
    outcome: &AnalysisOutcome,
    generated: DateTime<Local>,
) -> std::fmt::Result {
    let method = request.plant.method();
    let kind = request.controller.kind();

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "  System Response Analysis Export")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Request: {}", request.name)?;
    writeln!(out, "Fingerprint: {}", outcome.fingerprint)?;
    writeln!(out)?;

    section(out, "SYSTEM CONFIGURATION")?;
    writeln!(
        out,
        "Plant Model: Method {}: {}",
        method.number(),
        method.display_name()
    )?;
    writeln!(out, "Controller: {}", kind.display_name())?;
    writeln!(out)?;

    section(out, "PLANT PARAMETERS")?;
    for (spec, value) in plant_specs(method).iter().zip(request.plant.to_values()) {
        writeln!(out, "{} = {}", spec.label, value)?;
    }
    writeln!(out)?;

    section(out, "PLANT CHARACTERISTICS")?;
    writeln!(out, "Natural Frequency (ωn): {:.4} rad/s", outcome.plant.wn())?;
    writeln!(out, "Damping Ratio (ζ): {:.4}", outcome.plant.zeta())?;
    writeln!(out, "DC Gain (K): {:.4}", outcome.plant.k())?;
    writeln!(
        out,
        "Transfer Function: {}",
        format_transfer_function(outcome.plant.num(), outcome.plant.den())
    )?;
    writeln!(out)?;

    let gains = request.controller.to_values();
    if !gains.is_empty() {
        section(out, "CONTROLLER PARAMETERS")?;
        for (spec, value) in controller_specs(kind).iter().zip(gains) {
            writeln!(out, "{} = {}", spec.label, value)?;
        }
        writeln!(out)?;
    }

    section(out, "CLOSED-LOOP CHARACTERISTICS")?;
    let perf = &outcome.performance;
    writeln!(
        out,
        "Transfer Function: {}",
        format_transfer_function(outcome.closed_loop.num(), outcome.closed_loop.den())
    )?;
    writeln!(
        out,
        "Stability: {}",
        if perf.is_stable { "STABLE" } else { "UNSTABLE" }
    )?;
    writeln!(out, "Closed-Loop Poles:")?;
    write_roots(out, "p", &perf.poles)?;
    writeln!(out, "Closed-Loop Zeros:")?;
    write_roots(out, "z", &perf.zeros)?;
    writeln!(out, "CL Natural Frequency: {:.4} rad/s", perf.cl_wn)?;
    writeln!(out, "CL Damping Ratio: {:.4}", perf.cl_zeta)?;
    match perf.overshoot_pct {
        Some(os) => writeln!(out, "Est. Overshoot: {:.2} %", os)?,
        None => writeln!(out, "Est. Overshoot: N/A")?,
    }
    match perf.settling_time_s {
        Some(ts) => writeln!(out, "Est. Settling Time (4%): {:.3} s", ts)?,
        None => writeln!(out, "Est. Settling Time (4%): N/A")?,
    }
    if !outcome.warnings.is_empty() {
        writeln!(out, "Numerical Guards:")?;
        for warning in &outcome.warnings {
            writeln!(out, "  {}", warning)?;
        }
    }
    writeln!(out)?;

    section(out, "FREQUENCY DOMAIN CHARACTERISTICS")?;
    writeln!(
        out,
        "-3dB Bandwidth: {}",
        format_frequency(outcome.crossovers.bandwidth)
    )?;
    for (target, omega) in outcome.crossovers.phase() {
        writeln!(
            out,
            "{}° Phase Crossover: {}",
            target,
            format_frequency(omega)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn format_frequency(omega: Option<Real>) -> String {
    match omega {
        Some(w) => format!("{:.4} rad/s ({:.4} Hz)", w, w / (2.0 * PI)),
        None => "N/A".to_string(),
    }
}

/// One line per root; a conjugate pair shares a line in `re ± jim` form.
fn write_roots(out: &mut String, prefix: &str, roots: &RootSet) -> std::fmt::Result {
    if roots.is_empty() {
        return writeln!(out, "  (none)");
    }
    let slice = roots.as_slice();
    let mut i = 0;
    while i < slice.len() {
        let r = slice[i];
        if is_complex(&r) {
            writeln!(out, "  {}{} = {:.6} ± j{:.6}", prefix, i + 1, r.re, r.im.abs())?;
            if slice.get(i + 1).is_some_and(|next| is_conjugate(&r, next)) {
                i += 1;
            }
        } else {
            writeln!(out, "  {}{} = {:.6}", prefix, i + 1, r.re)?;
        }
        i += 1;
    }
    Ok(())
}

fn is_conjugate(a: &Complex<Real>, b: &Complex<Real>) -> bool {
    let tol = 1e-9 * a.norm().max(1.0);
    (a.re - b.re).abs() <= tol && (a.im + b.im).abs() <= tol
}

/// `num / den` in powers of `s`, zero terms omitted.
pub fn format_transfer_function(num: &[Real], den: &[Real]) -> String {
    format!(
        "({}) / ({})",
        format_polynomial(num),
        format_polynomial(den)
    )
}

pub fn format_polynomial(coeffs: &[Real]) -> String {
    let degree = coeffs.len().saturating_sub(1);
    let terms: Vec<String> = coeffs
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.0)
        .map(|(i, c)| match degree - i {
            0 => format!("{}", c),
            1 => format!("{}·s", c),
            p => format!("{}·s^{}", c, p),
        })
        .collect();
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ").replace("+ -", "- ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis_service::analyze;
    use chrono::TimeZone;
    use cs_model::ControllerModel;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn open_loop_report_sections() {
        let request = AnalysisRequest::default();
        let outcome = analyze(&request).unwrap();
        let text = render_report_at(&request, &outcome, fixed_time());

        assert!(text.starts_with(&"=".repeat(40)));
        assert!(text.contains("Generated: 2024-03-01 12:30:00"));
        assert!(text.contains("Plant Model: Method 2: Natural Frequency & Damping"));
        assert!(text.contains("Controller: None"));
        assert!(text.contains("Natural Frequency (ωn) = 5"));
        assert!(!text.contains("CONTROLLER PARAMETERS"));
        assert!(text.contains("Stability: STABLE"));
        assert!(text.contains("p1 = -3.500000 ± j3.570714"));
        assert!(!text.contains("p2 ="));
        assert!(text.contains("Closed-Loop Zeros:\n  (none)"));
        assert!(text.contains("Est. Overshoot: 4.60 %"));
        assert!(text.contains("Est. Settling Time (4%): 1.143 s"));
        let p90 = outcome.crossovers.phase_90.unwrap();
        assert!(text.contains(&format!("-90° Phase Crossover: {:.4} rad/s", p90)));
        assert!(text.contains(&outcome.fingerprint));
    }

    #[test]
    fn pid_report_lists_gains_and_real_poles() {
        let request = AnalysisRequest {
            controller: ControllerModel::Pid {
                kp: 2.0,
                ki: 1.0,
                kd: 0.0,
            },
            ..AnalysisRequest::default()
        };
        let outcome = analyze(&request).unwrap();
        let text = render_report_at(&request, &outcome, fixed_time());
        assert!(text.contains("CONTROLLER PARAMETERS"));
        assert!(text.contains("Proportional Gain (Kp) = 2"));
        assert!(text.contains("z1 = -0.500000"));
    }

    #[test]
    fn unstable_report_uses_na() {
        let request = AnalysisRequest {
            controller: ControllerModel::Pid {
                kp: 0.0,
                ki: 0.0,
                kd: 0.0,
            },
            ..AnalysisRequest::default()
        };
        let outcome = analyze(&request).unwrap();
        let text = render_report_at(&request, &outcome, fixed_time());
        assert!(text.contains("Stability: UNSTABLE"));
        assert!(text.contains("p1 = 0.000000"));
    }

    #[test]
    fn polynomial_formatting() {
        assert_eq!(format_polynomial(&[1.0, 7.0, 25.0]), "1·s^2 + 7·s + 25");
        assert_eq!(format_polynomial(&[0.0, 0.0, 25.0]), "25");
        assert_eq!(format_polynomial(&[1.0, -13.0, 25.0]), "1·s^2 - 13·s + 25");
        assert_eq!(format_polynomial(&[0.0, 0.0]), "0");
        assert_eq!(format_polynomial(&[]), "0");
    }
}
