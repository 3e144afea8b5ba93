//! Thin-lens geometry.
//!
//! `1/f = 1/do + 1/di` solved for the image distance, then magnification
//! `m = di/do` and the working f-number `N_eff = N·(1 + m)`.

use serde::Serialize;

use crate::input::InputSnapshot;
use crate::pipeline::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryResult {
    pub aperture_diameter_mm: f64,
    pub effective_f_number: f64,
    pub working_distance_mm: f64,
    pub image_distance_mm: f64,
    /// Image size over object size
    pub magnification: f64,
    pub magnification_percent: f64,
}

/// Image distance for an object at `working_distance_mm`.
///
/// Fails when the object sits at or inside the focal length: no real image forms.
pub fn image_distance_mm(focal_length_mm: f64, working_distance_mm: f64) -> Result<f64, PipelineError> {
    let denom = working_distance_mm - focal_length_mm;
    if denom <= 0.0 {
        return Err(PipelineError::DegenerateGeometry(format!(
            "working distance {} mm must exceed focal length {} mm",
            working_distance_mm, focal_length_mm
        )));
    }
    Ok(focal_length_mm * working_distance_mm / denom)
}

pub fn compute(input: &InputSnapshot) -> Result<GeometryResult, PipelineError> {
    let f = input.focal_length_mm;
    let n = input.f_number;
    let d_o = input.working_distance_mm;

    let d_i = image_distance_mm(f, d_o)?;
    let m = d_i / d_o;

    Ok(GeometryResult {
        aperture_diameter_mm: f / n,
        effective_f_number: n * (1.0 + m),
        working_distance_mm: d_o,
        image_distance_mm: d_i,
        magnification: m,
        magnification_percent: m * 100.0,
    })
}
