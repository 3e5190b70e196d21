//! Plant and controller models for ctrlscope.
//!
//! This crate turns raw parameter vectors into transfer functions:
//! - **Plant**: five equivalent parameterizations of a second-order plant,
//!   converted to and from one canonical (ωn, ζ, K, num, den) form
//! - **Controller**: none, PID, or state feedback
//! - **Closed loop**: unity-feedback synthesis of plant and controller
//!
//! # Conventions
//!
//! - Polynomials are `Vec<f64>` / `[f64; 3]`, highest degree first
//! - Every conversion is a pure function; nothing here holds state
//! - Degenerate numbers are repaired locally and reported as [`ModelWarning`]s,
//!   only malformed input vectors are errors

pub mod canonical;
pub mod closed_loop;
pub mod controller;
pub mod error;
pub mod plant;

pub use canonical::{from_canonical, to_canonical, CanonicalPlantModel, ModelWarning};
pub use closed_loop::{synthesize, ClosedLoopModel};
pub use controller::{ControllerKind, ControllerModel};
pub use error::{ModelResult, ValidationError};
pub use plant::{PlantMethod, PlantParameterSet, RoundTripFidelity};
