//! Simulation horizon chosen from the closed-loop poles.

use cs_core::guards::STABILITY_MARGIN;
use cs_core::sweep::linspace;
use cs_core::Real;

use crate::roots::PoleSet;

/// Samples in a response time grid.
pub const DEFAULT_TIME_POINTS: usize = 1000;

/// Horizon used when the loop does not decay.
const FALLBACK_TIME_CONSTANT: Real = 10.0;

/// Slowest time constant of a decaying loop, at least one second.
///
/// Unstable or marginal loops (and loops with no poles) get a fixed 10 s.
pub fn auto_horizon(poles: &PoleSet) -> Real {
    match poles.max_real() {
        Some(re) if re < -STABILITY_MARGIN => (4.0 / re.abs()).max(1.0),
        _ => FALLBACK_TIME_CONSTANT,
    }
}

/// Uniform grid over `[0, 4·T]` where `T` is [`auto_horizon`].
pub fn time_grid(poles: &PoleSet, points: usize) -> Vec<Real> {
    linspace(0.0, 4.0 * auto_horizon(poles), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roots::RootSet;

    #[test]
    fn slow_pole_sets_horizon() {
        let poles = RootSet::from_polynomial(&[1.0, 7.0, 25.0]);
        // max re = -3.5 → 4/3.5
        assert!((auto_horizon(&poles) - 4.0 / 3.5).abs() < 1e-9);

        let slow = RootSet::from_polynomial(&[1.0, 0.2]);
        assert!((auto_horizon(&slow) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn fast_poles_floor_at_one_second() {
        // (s + 10)(s + 20)
        let poles = RootSet::from_polynomial(&[1.0, 30.0, 200.0]);
        assert_eq!(auto_horizon(&poles), 1.0);
    }

    #[test]
    fn non_decaying_loops_use_fallback() {
        assert_eq!(auto_horizon(&RootSet::from_polynomial(&[1.0, -1.0])), 10.0);
        assert_eq!(auto_horizon(&RootSet::from_polynomial(&[1.0, 0.0, 4.0])), 10.0);
        assert_eq!(auto_horizon(&RootSet::default()), 10.0);
    }

    #[test]
    fn grid_spans_four_horizons() {
        let poles = RootSet::from_polynomial(&[1.0, 0.5]);
        let t = time_grid(&poles, DEFAULT_TIME_POINTS);
        assert_eq!(t.len(), DEFAULT_TIME_POINTS);
        assert_eq!(t[0], 0.0);
        assert!((t[DEFAULT_TIME_POINTS - 1] - 32.0).abs() < 1e-9);
    }
}
