//! Calculation Pipeline - Single Entry Point
//!
//! CRITICAL: every calculation resolves and validates its input first. No bypass.
//! Stages run in dependency order; the five middle engines only read
//! geometry and sampling and could run in any order.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::hashing::{compute_input_hash, compute_report_hash};
use crate::input::{resolve_with, InputSnapshot, RawInput};
use crate::report::{Categories, Report};
use crate::validation::{ValidationError, Validator};
use crate::{appearance, coverage, diffraction, dof, flags, geometry, illumination, motion, sampling};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Rejected design, as opposed to a failure to read or write files.
    pub fn is_design_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DegenerateGeometry(_))
    }
}

/// A report plus the fingerprints needed to reproduce it.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub input_hash: String,
    pub report_hash: String,
    pub report: Report,
}

/// The calculation pipeline - single entry point for all report generation
pub struct Calculator {
    validator: Validator,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
        }
    }

    /// Resolve raw fields into a snapshot
    ///
    /// This is the ONLY resolution entry point.
    pub fn resolve(&self, raw: &RawInput) -> Result<InputSnapshot, PipelineError> {
        Ok(resolve_with(raw, &self.validator)?)
    }

    /// Calculate a report
    ///
    /// CRITICAL: This ALWAYS resolves the input first.
    pub fn calculate(&self, raw: &RawInput) -> Result<Report, PipelineError> {
        let snapshot = self.resolve(raw)?;
        compute(&snapshot)
    }

    /// Calculate and wrap the report in a manifest
    pub fn run(&self, raw: &RawInput) -> Result<RunManifest, PipelineError> {
        let snapshot = self.resolve(raw)?;
        let report = compute(&snapshot)?;

        let input_hash = compute_input_hash(&snapshot)?;
        let report_hash = compute_report_hash(&report)?;
        debug!("input {} -> report {}", input_hash, report_hash);

        Ok(RunManifest {
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            input_hash,
            report_hash,
            report,
        })
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with the default rules and calculate.
pub fn calculate(raw: &RawInput) -> Result<Report, PipelineError> {
    Calculator::default().calculate(raw)
}

/// Run every engine over a resolved snapshot.
pub fn compute(input: &InputSnapshot) -> Result<Report, PipelineError> {
    let geometry = geometry::compute(input)?;
    debug!(
        "geometry: m={:.5} di={:.4} mm N_eff={:.3}",
        geometry.magnification, geometry.image_distance_mm, geometry.effective_f_number
    );

    let sampling = sampling::compute(input, &geometry)?;
    debug!(
        "sampling: {}x{} px, fov {:.3}x{:.3} mm",
        sampling.sensor.pixels_horz,
        sampling.sensor.pixels_vert,
        sampling.fov.fov_width_mm,
        sampling.fov.fov_height_mm
    );

    let motion = motion::compute(input, &sampling.fov);
    let dof = dof::compute(input);
    let diffraction = diffraction::compute(input, &geometry, &sampling.sensor);
    let coverage = coverage::compute(input, &sampling.fov);
    let illumination = illumination::compute(input, &geometry);
    debug!(
        "regime {}, corner illumination {:.1}%",
        diffraction.sampling_regime, illumination.relative_illumination_corner_percent
    );

    let appearances = appearance::compute(input, &sampling.fov);
    let flags = flags::evaluate(&diffraction, &motion, &coverage, &illumination);
    if flags.potential_vignetting {
        warn!(
            "potential vignetting: coverage_ok={}, corner ratio {:.3}",
            coverage.coverage_ok, illumination.corner_to_center_ratio
        );
    }

    Ok(Report::assemble(Categories {
        geometry,
        sampling,
        motion,
        dof,
        diffraction,
        coverage,
        illumination,
        appearances,
        flags,
    }))
}
