//! camcalc - Machine-Vision Camera Design Calculator
//!
//! One deterministic pass from camera, lens and scene parameters to a
//! report of derived optical and sampling quantities.
//!
//! # Pipeline
//! 1. Input resolution (defaults, mirroring, validation)
//! 2. Thin-lens geometry
//! 3. Sampling (pixel grid, Nyquist, field of view)
//! 4. Motion/exposure, depth of field, diffraction/MTF, coverage/distortion, illumination
//! 5. Appearance timing
//! 6. Flags
//! 7. Report assembly

pub mod quantity;
pub mod policy;
pub mod input;
pub mod validation;
pub mod geometry;
pub mod sampling;
pub mod motion;
pub mod dof;
pub mod diffraction;
pub mod coverage;
pub mod illumination;
pub mod appearance;
pub mod flags;
pub mod report;
pub mod hashing;
pub mod io;
pub mod pipeline;

pub use input::{resolve, InputSnapshot, MotionAxis, RawInput};
pub use validation::{ValidationError, ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use quantity::{Bounded, Distance, Sourced, ValueSource};
pub use diffraction::SamplingRegime;
pub use report::Report;
pub use hashing::{canonical_json, compute_input_hash, compute_report_hash};
pub use pipeline::{calculate, compute, Calculator, PipelineError, RunManifest};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
