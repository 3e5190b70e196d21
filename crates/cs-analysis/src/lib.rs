//! Time- and frequency-domain analysis of closed-loop models.
//!
//! - [`response`]: closed-form step and impulse responses
//! - [`frequency`]: Bode sweep and crossover extraction
//! - [`stability`]: pole-based stability and performance metrics
//! - [`roots`]: pole/zero sets with a fixed dominance order
//! - [`time_grid`]: simulation horizon chosen from the poles
//!
//! Everything here is a pure function of its inputs.

pub mod error;
pub mod frequency;
pub mod response;
pub mod roots;
pub mod stability;
pub mod time_grid;

pub use error::{AnalysisError, AnalysisResult};
pub use frequency::{
    bode, find_crossover, Crossovers, FrequencyResponse, FrequencySample, BANDWIDTH_DB,
    PHASE_TARGETS_DEG,
};
pub use response::{
    impulse_response, step_response, DampingRegime, SecondOrderParams, TimeResponse,
};
pub use roots::{is_complex, PoleSet, RootSet, ZeroSet};
pub use stability::{evaluate, PerformanceSummary};
pub use time_grid::{auto_horizon, time_grid, DEFAULT_TIME_POINTS};
