//! Qualitative design flags.

use serde::Serialize;

use crate::coverage::CoverageDistortionResult;
use crate::diffraction::DiffractionMtfResult;
use crate::illumination::IlluminationResult;
use crate::motion::MotionExposureResult;
use crate::policy::{DIFFRACTION_DOMINANT_RATIO, VIGNETTING_CORNER_RATIO};
use crate::quantity::Bounded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub diffraction_dominant: bool,
    pub exposure_limited_by_frame: bool,
    pub potential_vignetting: bool,
}

pub fn evaluate(
    diffraction: &DiffractionMtfResult,
    motion: &MotionExposureResult,
    coverage: &CoverageDistortionResult,
    illumination: &IlluminationResult,
) -> Flags {
    let exposure_limited_by_frame = match motion.max_exposure_us_motion_blur_1px {
        Bounded::Limited(us) => motion.frame_period_us < us,
        // zero speed: no blur limit for the frame to undercut
        Bounded::Unbounded => false,
    };

    Flags {
        diffraction_dominant: diffraction.nyquist_over_diffraction_cutoff > DIFFRACTION_DOMINANT_RATIO,
        exposure_limited_by_frame,
        potential_vignetting: !coverage.coverage_ok
            || illumination.corner_to_center_ratio < VIGNETTING_CORNER_RATIO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{resolve, RawInput};
    use crate::{coverage, diffraction, geometry, illumination, motion, sampling};

    struct Stages {
        diffraction: DiffractionMtfResult,
        motion: MotionExposureResult,
        coverage: CoverageDistortionResult,
        illumination: IlluminationResult,
    }

    impl Stages {
        fn flags(&self) -> Flags {
            evaluate(&self.diffraction, &self.motion, &self.coverage, &self.illumination)
        }
    }

    fn stages() -> Stages {
        let raw = RawInput {
            sensor_width_mm: Some(6.4),
            sensor_height_mm: Some(4.8),
            sensor_pixel_size_width_um: Some(3.45),
            sensor_framerate: Some(60.0),
            lens_focal_length_mm: Some(25.0),
            lens_fstop: Some(2.8),
            lens_diagonal_mm: Some(11.0),
            working_distance_mm: Some(200.0),
            object_initial_speed_mm_s: Some(150.0),
            ..Default::default()
        };
        let input = resolve(&raw).unwrap();
        let geometry = geometry::compute(&input).unwrap();
        let sampling = sampling::compute(&input, &geometry).unwrap();
        Stages {
            diffraction: diffraction::compute(&input, &geometry, &sampling.sensor),
            motion: motion::compute(&input, &sampling.fov),
            coverage: coverage::compute(&input, &sampling.fov),
            illumination: illumination::compute(&input, &geometry),
        }
    }

    #[test]
    fn test_well_matched_design_raises_nothing() {
        let flags = stages().flags();
        assert_eq!(
            flags,
            Flags {
                diffraction_dominant: false,
                exposure_limited_by_frame: false,
                potential_vignetting: false,
            }
        );
    }

    #[test]
    fn test_diffraction_dominant_strictly_above_one() {
        let mut s = stages();
        s.diffraction.nyquist_over_diffraction_cutoff = 1.0;
        assert!(!s.flags().diffraction_dominant);
        s.diffraction.nyquist_over_diffraction_cutoff = 1.01;
        assert!(s.flags().diffraction_dominant);
    }

    #[test]
    fn test_frame_limit_compares_against_one_pixel_exposure() {
        let mut s = stages();
        let frame = s.motion.frame_period_us;
        s.motion.max_exposure_us_motion_blur_1px = Bounded::Limited(frame * 0.5);
        assert!(!s.flags().exposure_limited_by_frame);
        s.motion.max_exposure_us_motion_blur_1px = Bounded::Limited(frame);
        assert!(!s.flags().exposure_limited_by_frame);
        s.motion.max_exposure_us_motion_blur_1px = Bounded::Limited(frame * 2.0);
        assert!(s.flags().exposure_limited_by_frame);
    }

    #[test]
    fn test_unbounded_blur_exposure_is_not_frame_limited() {
        let mut s = stages();
        s.motion.max_exposure_us_motion_blur_1px = Bounded::Unbounded;
        assert!(!s.flags().exposure_limited_by_frame);
    }

    #[test]
    fn test_vignetting_from_corner_ratio_alone() {
        let mut s = stages();
        assert!(s.coverage.coverage_ok);
        s.illumination.corner_to_center_ratio = 0.7;
        assert!(!s.flags().potential_vignetting);
        s.illumination.corner_to_center_ratio = 0.69;
        assert!(s.flags().potential_vignetting);
    }

    #[test]
    fn test_vignetting_from_coverage_alone() {
        let mut s = stages();
        assert!(s.illumination.corner_to_center_ratio >= VIGNETTING_CORNER_RATIO);
        s.coverage.coverage_ok = false;
        assert!(s.flags().potential_vignetting);
    }
}
