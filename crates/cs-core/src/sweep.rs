//! Sample grid generation.
//!
//! Time vectors are linear, frequency vectors logarithmic. Both keep the
//! user-specified bounds and generate points on demand.

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::Real;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SweepKind {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Definition of a single sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDefinition {
    pub start: Real,
    pub end: Real,
    pub num_points: usize,
    pub kind: SweepKind,
}

impl SweepDefinition {
    pub fn new(start: Real, end: Real, num_points: usize, kind: SweepKind) -> CoreResult<Self> {
        crate::ensure_finite(start, "sweep start")?;
        crate::ensure_finite(end, "sweep end")?;
        if num_points < 2 {
            return Err(CoreError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        if (start - end).abs() < 1e-12 {
            return Err(CoreError::InvalidArg {
                what: "sweep start and end must differ",
            });
        }
        if kind == SweepKind::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(CoreError::InvalidArg {
                what: "logarithmic sweep bounds must be positive",
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
            kind,
        })
    }

    /// Default Bode grid: 300 points over [1e-2, 1e2] rad/s.
    pub fn default_frequency() -> Self {
        Self {
            start: 1e-2,
            end: 1e2,
            num_points: 300,
            kind: SweepKind::Logarithmic,
        }
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<Real> {
        match self.kind {
            SweepKind::Linear => linspace(self.start, self.end, self.num_points),
            SweepKind::Logarithmic => logspace(self.start, self.end, self.num_points),
        }
    }
}

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = end;
            points
        }
    }
}

/// `n` logarithmically spaced points from `start` to `end` inclusive.
///
/// Falls back to linear spacing when either bound is not positive.
pub fn logspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    if start <= 0.0 || end <= 0.0 {
        return linspace(start, end, n);
    }
    let mut points: Vec<Real> = linspace(start.log10(), end.log10(), n)
        .into_iter()
        .map(|e| 10.0_f64.powf(e))
        .collect();
    if let Some(first) = points.first_mut() {
        *first = start;
    }
    if let Some(last) = points.last_mut() {
        *last = end;
    }
    points
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let pts = linspace(0.0, 4.0, 5);
        assert_eq!(pts, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn logspace_is_geometric() {
        let pts = logspace(1e-2, 1e2, 5);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], 1e-2);
        assert_eq!(pts[4], 1e2);
        for w in pts.windows(2) {
            assert!((w[1] / w[0] - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn default_frequency_grid() {
        let sweep = SweepDefinition::default_frequency();
        let pts = sweep.generate_points();
        assert_eq!(pts.len(), 300);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn rejects_bad_definitions() {
        assert!(SweepDefinition::new(1.0, 1.0, 10, SweepKind::Linear).is_err());
        assert!(SweepDefinition::new(0.0, 1.0, 1, SweepKind::Linear).is_err());
        assert!(SweepDefinition::new(0.0, 1.0, 10, SweepKind::Logarithmic).is_err());
        assert!(SweepDefinition::new(Real::NAN, 1.0, 10, SweepKind::Linear).is_err());
        assert!(SweepDefinition::new(0.0, 1.0, 10, SweepKind::Linear).is_ok());
    }
}
