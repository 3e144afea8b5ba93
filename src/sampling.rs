//! Pixel grid and object-space sampling.

use serde::Serialize;

use crate::geometry::GeometryResult;
use crate::input::{InputSnapshot, MotionAxis};
use crate::pipeline::PipelineError;
use crate::quantity::ValueSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorResult {
    pub pixels_horz: u64,
    pub pixels_vert: u64,
    pub total_pixels: u64,
    pub aspect_ratio: f64,
    pub pixel_size_width_um: f64,
    pub pixel_size_width_source: ValueSource,
    pub pixel_size_height_um: f64,
    pub pixel_size_height_source: ValueSource,
    pub sensor_diagonal_mm: f64,
    pub sensor_diagonal_source: ValueSource,
    pub sensor_nyquist_lp_per_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FovSamplingResult {
    pub fov_width_mm: f64,
    pub fov_height_mm: f64,
    pub fov_diagonal_mm: f64,
    pub fov_area_mm2: f64,
    pub pixels_per_mm_x: f64,
    pub pixels_per_mm_y: f64,
    pub mm_per_pixel_x: f64,
    pub mm_per_pixel_y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov_width_actual_vs_target_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov_height_actual_vs_target_percent: Option<f64>,
}

impl FovSamplingResult {
    pub fn pixels_per_mm(&self, axis: MotionAxis) -> f64 {
        match axis {
            MotionAxis::W => self.pixels_per_mm_x,
            MotionAxis::H => self.pixels_per_mm_y,
        }
    }

    pub fn extent_mm(&self, axis: MotionAxis) -> f64 {
        match axis {
            MotionAxis::W => self.fov_width_mm,
            MotionAxis::H => self.fov_height_mm,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingResult {
    pub sensor: SensorResult,
    pub fov: FovSamplingResult,
}

/// Nyquist frequency of a pixel grid, lp/mm, from its tighter pitch.
pub fn nyquist_lp_per_mm(pitch_w_um: f64, pitch_h_um: f64) -> f64 {
    1.0 / (2.0 * pitch_w_um.min(pitch_h_um) / 1000.0)
}

fn pixel_count(dim_mm: f64, pitch_um: f64) -> u64 {
    (dim_mm / (pitch_um / 1000.0)).round() as u64
}

pub fn compute(input: &InputSnapshot, geometry: &GeometryResult) -> Result<SamplingResult, PipelineError> {
    let pitch_w = input.pixel_pitch_width_um;
    let pitch_h = input.pixel_pitch_height_um;

    let pixels_horz = pixel_count(input.sensor_width_mm, pitch_w.value());
    let pixels_vert = pixel_count(input.sensor_height_mm, pitch_h.value());
    if pixels_horz == 0 || pixels_vert == 0 {
        return Err(PipelineError::DegenerateGeometry(format!(
            "pixel grid {}x{} has an empty axis; pitch exceeds sensor size",
            pixels_horz, pixels_vert
        )));
    }

    let total_pixels = pixels_horz.checked_mul(pixels_vert).ok_or_else(|| {
        PipelineError::DegenerateGeometry(format!(
            "pixel grid {}x{} overflows the total pixel count",
            pixels_horz, pixels_vert
        ))
    })?;

    let sensor = SensorResult {
        pixels_horz,
        pixels_vert,
        total_pixels,
        aspect_ratio: input.sensor_width_mm / input.sensor_height_mm,
        pixel_size_width_um: pitch_w.value(),
        pixel_size_width_source: pitch_w.source(),
        pixel_size_height_um: pitch_h.value(),
        pixel_size_height_source: pitch_h.source(),
        sensor_diagonal_mm: input.sensor_diagonal_mm.value(),
        sensor_diagonal_source: input.sensor_diagonal_mm.source(),
        sensor_nyquist_lp_per_mm: nyquist_lp_per_mm(pitch_w.value(), pitch_h.value()),
    };

    let m = geometry.magnification;
    let fov_width_mm = input.sensor_width_mm / m;
    let fov_height_mm = input.sensor_height_mm / m;
    let pixels_per_mm_x = pixels_horz as f64 / fov_width_mm;
    let pixels_per_mm_y = pixels_vert as f64 / fov_height_mm;

    let fov = FovSamplingResult {
        fov_width_mm,
        fov_height_mm,
        fov_diagonal_mm: fov_width_mm.hypot(fov_height_mm),
        fov_area_mm2: fov_width_mm * fov_height_mm,
        pixels_per_mm_x,
        pixels_per_mm_y,
        mm_per_pixel_x: 1.0 / pixels_per_mm_x,
        mm_per_pixel_y: 1.0 / pixels_per_mm_y,
        fov_width_actual_vs_target_percent: input
            .target_fov_width_mm
            .map(|target| 100.0 * fov_width_mm / target),
        fov_height_actual_vs_target_percent: input
            .target_fov_height_mm
            .map(|target| 100.0 * fov_height_mm / target),
    };

    Ok(SamplingResult { sensor, fov })
}
