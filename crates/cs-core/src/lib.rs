//! cs-core: numeric foundation for ctrlscope.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - guards (named epsilon thresholds used by the analysis pipeline)
//! - poly (coefficient-vector polynomial algebra and root finding)
//! - sweep (linear/logarithmic sample grids)
//! - error (shared error types)

pub mod error;
pub mod guards;
pub mod numeric;
pub mod poly;
pub mod sweep;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use nalgebra::Complex;
pub use numeric::*;
pub use sweep::{SweepDefinition, SweepKind};
