//! Motion blur and exposure limits.

use serde::Serialize;

use crate::input::{InputSnapshot, MotionAxis};
use crate::policy::RECOMMENDED_BLUR_PX;
use crate::quantity::Bounded;
use crate::sampling::FovSamplingResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionExposureResult {
    pub object_motion_axis: MotionAxis,
    pub object_speed_mm_s: f64,
    pub object_speed_px_s: f64,
    pub allowed_blur_pixels: f64,
    pub frame_period_us: f64,
    pub max_exposure_us_motion_blur_for_allowed_blur_px: Bounded<f64>,
    pub max_exposure_us_motion_blur_1px: Bounded<f64>,
    pub max_exposure_us_frame: f64,
    /// Never longer than the frame period
    pub recommended_exposure_us: f64,
}

/// Longest exposure (µs) keeping smear within `blur_px` at `speed_px_s`.
pub fn blur_limited_exposure_us(blur_px: f64, speed_px_s: f64) -> Bounded<f64> {
    if speed_px_s > 0.0 {
        Bounded::Limited(1e6 * blur_px / speed_px_s)
    } else {
        Bounded::Unbounded
    }
}

pub fn compute(input: &InputSnapshot, fov: &FovSamplingResult) -> MotionExposureResult {
    let speed_px_s = input.object_speed_mm_s * fov.pixels_per_mm(input.motion_axis);
    let frame_period_us = 1e6 / input.framerate_fps;

    let allowed = blur_limited_exposure_us(input.allowed_blur_px, speed_px_s);
    let one_px = blur_limited_exposure_us(RECOMMENDED_BLUR_PX, speed_px_s);

    let recommended_exposure_us = match one_px {
        Bounded::Limited(us) => us.min(frame_period_us),
        Bounded::Unbounded => frame_period_us,
    };

    MotionExposureResult {
        object_motion_axis: input.motion_axis,
        object_speed_mm_s: input.object_speed_mm_s,
        object_speed_px_s: speed_px_s,
        allowed_blur_pixels: input.allowed_blur_px,
        frame_period_us,
        max_exposure_us_motion_blur_for_allowed_blur_px: allowed,
        max_exposure_us_motion_blur_1px: one_px,
        max_exposure_us_frame: frame_period_us,
        recommended_exposure_us,
    }
}
