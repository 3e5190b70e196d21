//! Closed-loop synthesis.
//!
//! Combines a canonical plant with a controller under unity feedback:
//!
//! ```text
//!              C·G            num_ol
//! T(s) = ------------- = ----------------
//!            1 + C·G      den_ol + num_ol
//! ```
//!
//! State feedback on a state-space plant bypasses the transfer-function
//! algebra and works on A − B·K directly.

use cs_core::guards::{DEGENERATE_THRESHOLD, ZERO_NUMERATOR_FLOOR};
use cs_core::{poly, Real};
use serde::Serialize;

use crate::canonical::{guard_state_space_numerator, CanonicalPlantModel, ModelWarning};
use crate::controller::ControllerModel;
use crate::plant::PlantParameterSet;

/// Closed-loop transfer function.
///
/// `num` and `den` always have the same length; the degree is implied by the
/// length and any leading zeros are padding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLoopModel {
    num: Vec<Real>,
    den: Vec<Real>,
    warnings: Vec<ModelWarning>,
}

impl ClosedLoopModel {
    /// Build from raw polynomials, left-padding the shorter one.
    pub fn from_polynomials(num: Vec<Real>, den: Vec<Real>) -> Self {
        let len = num.len().max(den.len());
        Self {
            num: poly::pad_left(&num, len),
            den: poly::pad_left(&den, len),
            warnings: Vec::new(),
        }
    }

    fn with_warnings(mut self, warnings: Vec<ModelWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn num(&self) -> &[Real] {
        &self.num
    }

    pub fn den(&self) -> &[Real] {
        &self.den
    }

    /// Guards applied during synthesis.
    pub fn warnings(&self) -> &[ModelWarning] {
        &self.warnings
    }

    /// Degree of the characteristic polynomial.
    pub fn order(&self) -> usize {
        poly::degree(&self.den).unwrap_or(0)
    }

    /// Steady-state gain T(0), after cancelling integrators shared with
    /// zeros at the origin. Zero for an identically zero numerator, `None`
    /// when T(0) is unbounded.
    pub fn dc_gain(&self) -> Option<Real> {
        if poly::degree(&self.num).is_none() {
            return Some(0.0);
        }
        let (num, den) = poly::cancel_common_origin(&self.num, &self.den);
        let den0 = den.last().copied().unwrap_or(0.0);
        if den0.abs() < DEGENERATE_THRESHOLD {
            return None;
        }
        let num0 = num.last().copied().unwrap_or(0.0);
        Some(num0 / den0)
    }

    /// Copy safe to hand to the analyzers: an all-zero numerator becomes a
    /// tiny constant and an all-zero denominator becomes `s + 1`.
    pub fn guarded_for_analysis(&self) -> Self {
        let num = if poly::is_zero(&self.num, DEGENERATE_THRESHOLD) {
            vec![ZERO_NUMERATOR_FLOOR]
        } else {
            self.num.clone()
        };
        let den = if poly::is_zero(&self.den, DEGENERATE_THRESHOLD) {
            vec![1.0, 1.0]
        } else {
            self.den.clone()
        };
        Self::from_polynomials(num, den).with_warnings(self.warnings.clone())
    }
}

/// Closed-loop model for `plant` under `controller`.
///
/// `raw_plant` is the parameter set the plant was converted from; state
/// feedback needs it to recover the state matrix.
pub fn synthesize(
    plant: &CanonicalPlantModel,
    controller: &ControllerModel,
    raw_plant: &PlantParameterSet,
) -> ClosedLoopModel {
    match *controller {
        ControllerModel::None => {
            ClosedLoopModel::from_polynomials(plant.num().to_vec(), plant.den().to_vec())
        }
        ControllerModel::Pid { kp, ki, kd } => {
            let (num_c, den_c) = ControllerModel::pid_compensator(kp, ki, kd);
            let num_ol = poly::multiply(&num_c, plant.num());
            let den_ol = poly::multiply(&den_c, plant.den());
            unity_feedback(num_ol, &den_ol)
        }
        ControllerModel::StateFeedback { k1, k2 } => match raw_plant.state_matrix() {
            Some(a) => {
                // A_cl = A - B·K with B = [0; 1] only touches the second row.
                let a_cl = [[a[0][0], a[0][1]], [a[1][0] - k1, a[1][1] - k2]];
                let trace = a_cl[0][0] + a_cl[1][1];
                let det = a_cl[0][0] * a_cl[1][1] - a_cl[0][1] * a_cl[1][0];
                let mut warnings = Vec::new();
                // C·adj(sI - A_cl)·B with C = [1, 0] leaves only A_cl[0][1].
                let gain = guard_state_space_numerator(a_cl[0][1], &mut warnings);
                ClosedLoopModel::from_polynomials(vec![0.0, 0.0, gain], vec![1.0, -trace, det])
                    .with_warnings(warnings)
            }
            None => {
                // Output feedback approximation: K1 + K2 acts as one scalar gain.
                let k_eff = k1 + k2;
                tracing::debug!(k_eff, "state feedback on non state-space plant, using output gain");
                let num_ol = poly::scale(plant.num(), k_eff);
                unity_feedback(num_ol, plant.den())
            }
        },
    }
}

fn unity_feedback(num_ol: Vec<Real>, den_ol: &[Real]) -> ClosedLoopModel {
    let den_cl = poly::add(den_ol, &num_ol);
    ClosedLoopModel::from_polynomials(num_ol, den_cl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::to_canonical;
    use crate::plant::PlantMethod;

    fn plant(values: &[Real], method: PlantMethod) -> (CanonicalPlantModel, PlantParameterSet) {
        let raw = PlantParameterSet::from_values(method, values).unwrap();
        (CanonicalPlantModel::from_parameters(&raw), raw)
    }

    #[test]
    fn none_is_identity() {
        let (g, raw) = plant(&[5.0, 0.7, 1.0], PlantMethod::NaturalFrequency);
        let cl = synthesize(&g, &ControllerModel::None, &raw);
        assert_eq!(cl.num(), g.num());
        assert_eq!(cl.den(), g.den());
        assert_eq!(cl.order(), 2);
    }

    #[test]
    fn pid_zero_gains_give_all_zero_numerator() {
        let (g, raw) = plant(&[5.0, 0.7, 1.0], PlantMethod::NaturalFrequency);
        let pid = ControllerModel::Pid {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
        };
        let cl = synthesize(&g, &pid, &raw);
        assert_eq!(cl.num(), &[0.0; 5]);
        assert_eq!(cl.den().len(), 5);
        assert_eq!(cl.den()[0], 0.0);
        assert_eq!(cl.den()[1], 1.0);
        assert_eq!(cl.den()[3], 25.0);
        assert_eq!(cl.den()[4], 0.0);
        // Not the same model as the open-loop identity.
        let open = synthesize(&g, &ControllerModel::None, &raw);
        assert_ne!(cl.num(), open.num());
    }

    #[test]
    fn proportional_control_dc_gain() {
        let (g, raw) = plant(&[5.0, 0.7, 1.0], PlantMethod::NaturalFrequency);
        let p = ControllerModel::Pid {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        };
        let cl = synthesize(&g, &p, &raw);
        assert_eq!(cl.num(), &[0.0, 0.0, 0.0, 25.0, 0.0]);
        assert_eq!(cl.den()[3], 50.0);
        let dc = cl.dc_gain().unwrap();
        assert!((dc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn integral_action_removes_steady_state_error() {
        let (g, raw) = plant(&[5.0, 0.7, 1.0], PlantMethod::NaturalFrequency);
        let pid = ControllerModel::Pid {
            kp: 2.0,
            ki: 1.0,
            kd: 0.1,
        };
        let cl = synthesize(&g, &pid, &raw);
        assert_eq!(cl.order(), 3);
        assert!((cl.dc_gain().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn state_feedback_on_state_space_plant() {
        let (g, raw) = plant(&[0.0, 1.0, -25.0, -7.0], PlantMethod::StateSpace);
        let sf = ControllerModel::StateFeedback { k1: 1.0, k2: 1.0 };
        let cl = synthesize(&g, &sf, &raw);
        assert_eq!(cl.den(), &[1.0, 8.0, 26.0]);
        assert_eq!(cl.num(), &[0.0, 0.0, 1.0]);
        assert!(cl.warnings().is_empty());
    }

    #[test]
    fn state_feedback_uncontrollable_pair_is_guarded() {
        let (g, raw) = plant(&[-1.0, 0.0, 3.0, -2.0], PlantMethod::StateSpace);
        let sf = ControllerModel::StateFeedback { k1: 2.0, k2: 0.5 };
        let cl = synthesize(&g, &sf, &raw);
        assert_eq!(cl.num()[2], cs_core::guards::MIN_NUMERATOR);
        assert_eq!(cl.warnings().len(), 1);
    }

    #[test]
    fn state_feedback_fallback_sums_gains() {
        let g = to_canonical(&[5.0, 0.7, 1.0], PlantMethod::NaturalFrequency).unwrap();
        let raw = PlantParameterSet::NaturalFrequency {
            wn: 5.0,
            zeta: 0.7,
            k: 1.0,
        };
        let sf = ControllerModel::StateFeedback { k1: 1.5, k2: 0.5 };
        let cl = synthesize(&g, &sf, &raw);
        assert_eq!(cl.num(), &[0.0, 0.0, 50.0]);
        assert_eq!(cl.den()[2], 75.0);
    }

    #[test]
    fn guarded_copy_replaces_degenerate_polynomials() {
        let cl = ClosedLoopModel::from_polynomials(vec![0.0, 0.0], vec![0.0, 0.0]);
        let guarded = cl.guarded_for_analysis();
        assert_eq!(guarded.num(), &[0.0, ZERO_NUMERATOR_FLOOR]);
        assert_eq!(guarded.den(), &[1.0, 1.0]);
    }

    #[test]
    fn zero_numerator_has_zero_dc_gain() {
        let cl = ClosedLoopModel::from_polynomials(vec![0.0, 0.0, 0.0], vec![1.0, 7.0, 0.0]);
        assert_eq!(cl.dc_gain(), Some(0.0));
    }

    #[test]
    fn integrator_without_cancellation_has_no_dc_gain() {
        let cl = ClosedLoopModel::from_polynomials(vec![1.0], vec![1.0, 0.0]);
        assert!(cl.dc_gain().is_none());
    }
}
