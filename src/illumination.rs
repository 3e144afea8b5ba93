//! Relative illumination at the sensor corner.

use serde::Serialize;

use crate::geometry::GeometryResult;
use crate::input::InputSnapshot;
use crate::quantity::{Sourced, ValueSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IlluminationResult {
    pub relative_illumination_center_percent: f64,
    pub relative_illumination_corner_percent: f64,
    pub corner_to_center_ratio: f64,
    pub relative_illumination_source: ValueSource,
    pub corner_field_angle_deg: f64,
    pub vignetting_loss_percent: f64,
    pub exposure_compensation_stops_at_corners: f64,
}

/// Image-side field angle to the sensor corner, radians.
pub fn corner_field_angle_rad(sensor_diagonal_mm: f64, image_distance_mm: f64) -> f64 {
    (0.5 * sensor_diagonal_mm / image_distance_mm).atan()
}

/// Natural cos⁴ falloff at field angle `theta`.
pub fn cos4_falloff(theta_rad: f64) -> f64 {
    theta_rad.cos().powi(4)
}

pub fn compute(input: &InputSnapshot, geometry: &GeometryResult) -> IlluminationResult {
    let theta = corner_field_angle_rad(input.sensor_diagonal_mm.value(), geometry.image_distance_mm);

    let corner = match input.lens_relative_illumination {
        Some(ratio) => Sourced::Provided(ratio),
        None => Sourced::Derived(cos4_falloff(theta)),
    };
    let ratio = corner.value();
    let corner_percent = 100.0 * ratio;

    IlluminationResult {
        relative_illumination_center_percent: 100.0,
        relative_illumination_corner_percent: corner_percent,
        corner_to_center_ratio: ratio,
        relative_illumination_source: corner.source(),
        corner_field_angle_deg: theta.to_degrees(),
        vignetting_loss_percent: (100.0 - corner_percent).max(0.0),
        // ratio is in (0, 1] by resolution, so this stays finite
        exposure_compensation_stops_at_corners: (1.0 / ratio).log2(),
    }
}
