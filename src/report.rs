//! Report - Ordered Composition of Category Results
//!
//! Pure aggregation. Every category is a complete value computed upstream;
//! nothing here derives new numbers.

use serde::Serialize;

use crate::appearance::AppearanceResult;
use crate::coverage::CoverageDistortionResult;
use crate::diffraction::DiffractionMtfResult;
use crate::dof::DepthOfFieldResult;
use crate::flags::Flags;
use crate::geometry::GeometryResult;
use crate::illumination::IlluminationResult;
use crate::motion::MotionExposureResult;
use crate::sampling::{FovSamplingResult, SamplingResult, SensorResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sensor: SensorResult,
    pub lens_geometry: GeometryResult,
    pub fov_sampling: FovSamplingResult,
    pub motion_exposure: MotionExposureResult,
    pub depth_of_field: DepthOfFieldResult,
    pub diffraction_mtf: DiffractionMtfResult,
    pub coverage_distortion: CoverageDistortionResult,
    pub illumination: IlluminationResult,
    pub appearances: AppearanceResult,
    pub flags: Flags,
}

/// Category outputs awaiting assembly.
pub struct Categories {
    pub geometry: GeometryResult,
    pub sampling: SamplingResult,
    pub motion: MotionExposureResult,
    pub dof: DepthOfFieldResult,
    pub diffraction: DiffractionMtfResult,
    pub coverage: CoverageDistortionResult,
    pub illumination: IlluminationResult,
    pub appearances: AppearanceResult,
    pub flags: Flags,
}

impl Report {
    pub fn assemble(parts: Categories) -> Self {
        Self {
            sensor: parts.sampling.sensor,
            lens_geometry: parts.geometry,
            fov_sampling: parts.sampling.fov,
            motion_exposure: parts.motion,
            depth_of_field: parts.dof,
            diffraction_mtf: parts.diffraction,
            coverage_distortion: parts.coverage,
            illumination: parts.illumination,
            appearances: parts.appearances,
            flags: parts.flags,
        }
    }

    /// Names of the top-level categories, in report order.
    pub const CATEGORIES: [&'static str; 10] = [
        "sensor",
        "lens_geometry",
        "fov_sampling",
        "motion_exposure",
        "depth_of_field",
        "diffraction_mtf",
        "coverage_distortion",
        "illumination",
        "appearances",
        "flags",
    ];
}
