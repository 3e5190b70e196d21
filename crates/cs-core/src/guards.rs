//! Named numeric guards.
//!
//! Every epsilon the pipeline uses to keep degenerate regimes finite lives
//! here, so tests can target the thresholds directly.

use crate::Real;

/// Smallest damping ratio the converter and response generator accept.
pub const MIN_DAMPING_RATIO: Real = 1e-3;

/// Half-width of the band around ζ = 1 treated as critically damped.
pub const CRITICAL_DAMPING_BAND: Real = 0.01;

/// Substitute numerator gain for an uncontrollable/unobservable state-space pair.
pub const MIN_NUMERATOR: Real = 1e-6;

/// |A12| below this makes the fixed B/C structure lose the input-output path.
pub const CONTROLLABILITY_THRESHOLD: Real = 1e-12;

/// Poles must satisfy Re(p) < -STABILITY_MARGIN to count as stable.
pub const STABILITY_MARGIN: Real = 1e-6;

/// |Im(p)| above this marks a pole as complex.
pub const IMAGINARY_TOLERANCE: Real = 1e-6;

/// Floor for a first-order time constant.
pub const MIN_TIME_CONSTANT: Real = 1e-6;

/// Floor for the leading (s²) coefficient of ODE / Laplace plants.
pub const MIN_LEADING_COEFFICIENT: Real = 1e-6;

/// Threshold for treating a determinant, constant term or coefficient as zero.
pub const DEGENERATE_THRESHOLD: Real = 1e-12;

/// Floor for natural frequencies fed to the response generator.
pub const MIN_NATURAL_FREQUENCY: Real = 1e-6;

/// Relative separation below which two real roots are treated as repeated.
pub const ROOT_COINCIDENCE: Real = 1e-9;

/// Time-domain outputs are clamped to ±RESPONSE_LIMIT.
pub const RESPONSE_LIMIT: Real = 1e6;

/// Added to |H(jω)| before taking log10.
pub const MAGNITUDE_EPSILON: Real = 1e-12;

/// Lower clamp for Bode magnitude in dB.
pub const MAGNITUDE_DB_MIN: Real = -200.0;

/// Upper clamp for Bode magnitude in dB.
pub const MAGNITUDE_DB_MAX: Real = 100.0;

/// Numerator used in place of an all-zero closed-loop numerator before analysis.
pub const ZERO_NUMERATOR_FLOOR: Real = 1e-12;
