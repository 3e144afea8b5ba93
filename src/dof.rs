//! Depth of field from the hyperfocal distance.
//!
//! The circle of confusion is the tighter pixel pitch: "sharp" means
//! blur no larger than one pixel.

use serde::Serialize;

use crate::input::InputSnapshot;
use crate::quantity::Distance;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthOfFieldResult {
    pub circle_of_confusion_mm_used: f64,
    pub hyperfocal_mm: f64,
    pub near_mm: f64,
    pub far_mm: Distance,
    #[serde(rename = "DOF_mm")]
    pub dof_mm: Distance,
}

/// `H = f²/(N·c) + f`
pub fn hyperfocal_mm(focal_length_mm: f64, f_number: f64, coc_mm: f64) -> f64 {
    focal_length_mm * focal_length_mm / (f_number * coc_mm) + focal_length_mm
}

pub fn depth_of_field(focal_length_mm: f64, f_number: f64, coc_mm: f64, subject_mm: f64) -> DepthOfFieldResult {
    let f = focal_length_mm;
    let h = hyperfocal_mm(f, f_number, coc_mm);

    let near_mm = h * subject_mm / (h + (subject_mm - f));

    let far_denom = h - (subject_mm - f);
    let (far_mm, dof_mm) = if far_denom <= 0.0 {
        (Distance::Infinite, Distance::Infinite)
    } else {
        let far = h * subject_mm / far_denom;
        (Distance::Finite(far), Distance::Finite(far - near_mm))
    };

    DepthOfFieldResult {
        circle_of_confusion_mm_used: coc_mm,
        hyperfocal_mm: h,
        near_mm,
        far_mm,
        dof_mm,
    }
}

pub fn compute(input: &InputSnapshot) -> DepthOfFieldResult {
    depth_of_field(
        input.focal_length_mm,
        input.f_number,
        input.min_pitch_mm(),
        input.working_distance_mm,
    )
}
