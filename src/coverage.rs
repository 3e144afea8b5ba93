//! Image-circle coverage and distortion at the used field.
//!
//! Distortion is rated at the lens's full image circle. It is rescaled
//! linearly to the fraction of that circle the sensor uses, and clamped
//! at the rated value when the sensor exceeds the circle.

use log::warn;
use serde::Serialize;

use crate::input::InputSnapshot;
use crate::sampling::FovSamplingResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageDistortionResult {
    pub coverage_ok: bool,
    pub coverage_margin_mm: f64,
    /// Sensor diagonal over lens image circle; above 1 the sensor overfills the lens
    pub coverage_ratio_actual_vs_design: f64,
    pub fov_width_scale_vs_design: f64,
    pub fov_height_scale_vs_design: f64,
    pub fov_area_scale_vs_design: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_distortion_percent_at_actual_edge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_position_error_mm_effective: Option<f64>,
    pub distortion_clamped: bool,
}

/// Distortion at the used field edge, percent, and whether it was clamped.
pub fn effective_distortion_percent(rated_percent: f64, coverage_ratio: f64) -> (f64, bool) {
    if coverage_ratio > 1.0 {
        (rated_percent, true)
    } else {
        (rated_percent * coverage_ratio, false)
    }
}

pub fn compute(input: &InputSnapshot, fov: &FovSamplingResult) -> CoverageDistortionResult {
    let sensor_diag = input.sensor_diagonal_mm.value();
    let lens_diag = input.lens_diagonal_mm;
    let ratio = sensor_diag / lens_diag;

    let effective = input
        .lens_distortion_percent
        .map(|d| effective_distortion_percent(d, ratio));

    let distortion_clamped = matches!(effective, Some((_, true)));
    if distortion_clamped {
        warn!(
            "sensor diagonal {:.3} mm exceeds lens image circle {:.3} mm; distortion held at rated value",
            sensor_diag, lens_diag
        );
    }

    let effective_percent = effective.map(|(pct, _)| pct);

    CoverageDistortionResult {
        coverage_ok: lens_diag >= sensor_diag,
        coverage_margin_mm: 0.5 * (lens_diag - sensor_diag),
        coverage_ratio_actual_vs_design: ratio,
        fov_width_scale_vs_design: ratio,
        fov_height_scale_vs_design: ratio,
        fov_area_scale_vs_design: ratio * ratio,
        effective_distortion_percent_at_actual_edge: effective_percent,
        edge_position_error_mm_effective: effective_percent.map(|pct| pct / 100.0 * (0.5 * fov.fov_diagonal_mm)),
        distortion_clamped,
    }
}
