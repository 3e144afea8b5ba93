//! Object transit timing across the field of view.
//!
//! The exact frame count depends on capture phase, so it is bracketed by
//! floor and ceiling of the expected count.

use serde::Serialize;

use crate::input::{InputSnapshot, MotionAxis};
use crate::quantity::Bounded;
use crate::sampling::FovSamplingResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceResult {
    pub appearance_axis_used: MotionAxis,
    pub traversal_extent_mm: f64,
    pub duration_s: Bounded<f64>,
    pub expected_frames: Bounded<f64>,
    pub frames_min: Bounded<u64>,
    pub frames_max: Bounded<u64>,
    pub displacement_per_frame_mm: f64,
    pub displacement_per_frame_px: f64,
}

pub fn compute(input: &InputSnapshot, fov: &FovSamplingResult) -> AppearanceResult {
    let axis = input.motion_axis;
    let extent_mm = fov.extent_mm(axis);
    let speed = input.object_speed_mm_s;
    let fps = input.framerate_fps;

    let (duration_s, expected_frames, frames_min, frames_max) = if speed > 0.0 {
        let duration = extent_mm / speed;
        let expected = duration * fps;
        (
            Bounded::Limited(duration),
            Bounded::Limited(expected),
            Bounded::Limited(expected.floor() as u64),
            Bounded::Limited(expected.ceil() as u64),
        )
    } else {
        (Bounded::Unbounded, Bounded::Unbounded, Bounded::Unbounded, Bounded::Unbounded)
    };

    let displacement_per_frame_mm = speed / fps;

    AppearanceResult {
        appearance_axis_used: axis,
        traversal_extent_mm: extent_mm,
        duration_s,
        expected_frames,
        frames_min,
        frames_max,
        displacement_per_frame_mm,
        displacement_per_frame_px: displacement_per_frame_mm * fov.pixels_per_mm(axis),
    }
}
