//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use approx::assert_relative_eq;

use camcalc::{
    calculate, hashing::canonical_json, Bounded, Calculator, Distance, MotionAxis, PipelineError,
    RawInput, Report, SamplingRegime, ValueSource,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 25 mm f/2.8 lens at 200 mm on a 6.4 x 4.8 mm, 3.45 µm sensor.
fn scenario_a() -> RawInput {
    RawInput {
        sensor_width_mm: Some(6.4),
        sensor_height_mm: Some(4.8),
        sensor_pixel_size_width_um: Some(3.45),
        sensor_pixel_size_height_um: Some(3.45),
        sensor_framerate: Some(60.0),
        lens_focal_length_mm: Some(25.0),
        lens_fstop: Some(2.8),
        lens_diagonal_mm: Some(11.0),
        working_distance_mm: Some(200.0),
        object_initial_speed_mm_s: Some(150.0),
        object_allowed_blur_pixels: Some(2.0),
        object_motion_axis: Some("W".to_string()),
        ..Default::default()
    }
}

fn report_for(raw: &RawInput) -> Report {
    init_logs();
    calculate(raw).expect("valid design")
}

#[test]
fn invariant_report_deterministic() {
    let raw = scenario_a();
    let a = serde_json::to_string(&report_for(&raw)).unwrap();
    let b = serde_json::to_string(&report_for(&raw)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invariant_report_has_every_category() {
    let value = serde_json::to_value(report_for(&scenario_a())).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), Report::CATEGORIES.len());
    for name in Report::CATEGORIES {
        assert!(object.contains_key(name), "missing category {}", name);
    }
}

#[test]
fn invariant_nyquist_from_tighter_pitch() {
    for (w, h) in [(3.45, 3.45), (5.5, 2.2), (1.1, 4.0), (7.4, 7.4)] {
        let raw = RawInput {
            sensor_pixel_size_width_um: Some(w),
            sensor_pixel_size_height_um: Some(h),
            ..scenario_a()
        };
        let report = report_for(&raw);
        let pitch_mm = f64::min(w / 1000.0, h / 1000.0);
        assert_relative_eq!(
            report.sensor.sensor_nyquist_lp_per_mm,
            1.0 / (2.0 * pitch_mm),
            max_relative = 1e-12
        );
    }
}

#[test]
fn invariant_pitch_mirroring() {
    let only_width = RawInput {
        sensor_pixel_size_height_um: None,
        ..scenario_a()
    };
    let report = report_for(&only_width);
    assert_eq!(report.sensor.pixel_size_height_um, 3.45);
    assert_eq!(report.sensor.pixel_size_height_source, ValueSource::Derived);

    let only_height = RawInput {
        sensor_pixel_size_width_um: None,
        sensor_pixel_size_height_um: Some(2.9),
        ..scenario_a()
    };
    let report = report_for(&only_height);
    assert_eq!(report.sensor.pixel_size_width_um, 2.9);
    assert_eq!(report.sensor.pixel_size_width_source, ValueSource::Derived);
}

#[test]
fn invariant_reciprocal_sampling() {
    for wd in [60.0, 200.0, 1500.0] {
        let raw = RawInput {
            working_distance_mm: Some(wd),
            ..scenario_a()
        };
        let fov = report_for(&raw).fov_sampling;
        assert_relative_eq!(fov.mm_per_pixel_x, 1.0 / fov.pixels_per_mm_x, max_relative = 1e-12);
        assert_relative_eq!(fov.mm_per_pixel_y, 1.0 / fov.pixels_per_mm_y, max_relative = 1e-12);
    }
}

#[test]
fn invariant_hyperfocal_monotonic_in_f_number() {
    let mut previous = f64::INFINITY;
    for n in [1.4, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0] {
        let raw = RawInput {
            lens_fstop: Some(n),
            ..scenario_a()
        };
        let h = report_for(&raw).depth_of_field.hyperfocal_mm;
        assert!(h < previous, "hyperfocal must shrink as the lens stops down");
        previous = h;
    }
}

#[test]
fn invariant_recommended_exposure_capped_by_frame() {
    for speed in [0.0, 1.0, 50.0, 5000.0] {
        for fps in [5.0, 60.0, 500.0] {
            let raw = RawInput {
                object_initial_speed_mm_s: Some(speed),
                sensor_framerate: Some(fps),
                ..scenario_a()
            };
            let motion = report_for(&raw).motion_exposure;
            assert!(motion.recommended_exposure_us <= motion.frame_period_us);
        }
    }
}

#[test]
fn invariant_recommended_ignores_allowed_blur() {
    let loose = RawInput {
        object_allowed_blur_pixels: Some(10.0),
        ..scenario_a()
    };
    let tight = RawInput {
        object_allowed_blur_pixels: Some(0.5),
        ..scenario_a()
    };
    let a = report_for(&loose).motion_exposure;
    let b = report_for(&tight).motion_exposure;
    assert_eq!(a.recommended_exposure_us, b.recommended_exposure_us);
    assert_ne!(
        a.max_exposure_us_motion_blur_for_allowed_blur_px,
        b.max_exposure_us_motion_blur_for_allowed_blur_px
    );
}

#[test]
fn scenario_a_magnification_and_fov() {
    let report = report_for(&scenario_a());
    assert_relative_eq!(report.lens_geometry.magnification, 25.0 / 175.0, max_relative = 1e-12);
    assert_relative_eq!(report.lens_geometry.image_distance_mm, 5000.0 / 175.0, max_relative = 1e-12);
    assert_relative_eq!(report.lens_geometry.effective_f_number, 2.8 * (1.0 + 25.0 / 175.0), max_relative = 1e-12);
    assert_relative_eq!(report.lens_geometry.aperture_diameter_mm, 25.0 / 2.8, max_relative = 1e-12);
    assert_relative_eq!(report.fov_sampling.fov_width_mm, 44.8, max_relative = 1e-9);
    assert_relative_eq!(report.fov_sampling.fov_height_mm, 33.6, max_relative = 1e-9);
    assert_eq!(report.sensor.pixels_horz, 1855);
    assert_eq!(report.sensor.pixels_vert, 1391);
    assert_eq!(report.sensor.total_pixels, 1855 * 1391);
}

#[test]
fn scenario_b_zero_speed_is_unbounded() {
    let raw = RawInput {
        object_initial_speed_mm_s: Some(0.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    let motion = &report.motion_exposure;
    assert_relative_eq!(motion.frame_period_us, 16666.666666, max_relative = 1e-9);
    assert_eq!(motion.max_exposure_us_motion_blur_1px, Bounded::Unbounded);
    assert_eq!(motion.max_exposure_us_motion_blur_for_allowed_blur_px, Bounded::Unbounded);
    assert_eq!(motion.recommended_exposure_us, motion.frame_period_us);
    assert!(!report.flags.exposure_limited_by_frame);
    assert_eq!(report.appearances.duration_s, Bounded::Unbounded);
    assert_eq!(report.appearances.frames_max, Bounded::Unbounded);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["motion_exposure"]["max_exposure_us_motion_blur_1px"], "unbounded");
}

#[test]
fn scenario_c_sensor_overfills_image_circle() {
    let raw = RawInput {
        sensor_width_mm: Some(7.2),
        sensor_height_mm: Some(5.4),
        sensor_diagonal_mm: Some(9.0),
        lens_diagonal_mm: Some(8.0),
        lens_distortion_perc: Some(2.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    let coverage = &report.coverage_distortion;
    assert!(!coverage.coverage_ok);
    assert_eq!(coverage.coverage_margin_mm, -0.5);
    assert_relative_eq!(coverage.coverage_ratio_actual_vs_design, 1.125, max_relative = 1e-12);
    assert!(coverage.distortion_clamped);
    assert_eq!(coverage.effective_distortion_percent_at_actual_edge, Some(2.0));
    assert!(report.flags.potential_vignetting);
}

#[test]
fn scenario_d_object_at_focal_length_rejected() {
    let raw = RawInput {
        working_distance_mm: Some(25.0),
        ..scenario_a()
    };
    let result = Calculator::new().calculate(&raw);
    assert!(matches!(result, Err(PipelineError::DegenerateGeometry(_))));
}

#[test]
fn scenario_e_cos4_corner_illumination() {
    // 25 mm focused at 1275 mm puts the image plane at 25.5 mm
    let raw = RawInput {
        sensor_width_mm: Some(4.8),
        sensor_height_mm: Some(3.6),
        sensor_diagonal_mm: Some(6.0),
        working_distance_mm: Some(1275.0),
        lens_relative_illumination: None,
        ..scenario_a()
    };
    let report = report_for(&raw);
    let di = report.lens_geometry.image_distance_mm;
    assert_relative_eq!(di, 25.5, max_relative = 1e-9);

    let tan = 3.0 / di;
    let expected = (1.0 / (1.0 + tan * tan)).powi(2);
    let illum = &report.illumination;
    assert_eq!(illum.relative_illumination_source, ValueSource::Derived);
    assert_relative_eq!(illum.corner_to_center_ratio, expected, max_relative = 1e-12);
    assert_relative_eq!(illum.relative_illumination_corner_percent, 100.0 * expected, max_relative = 1e-12);
    assert_relative_eq!(illum.vignetting_loss_percent, 100.0 - 100.0 * expected, max_relative = 1e-9);
    assert_relative_eq!(illum.exposure_compensation_stops_at_corners, (1.0 / expected).log2(), max_relative = 1e-12);
}

#[test]
fn invariant_datasheet_illumination_used_verbatim() {
    let raw = RawInput {
        lens_relative_illumination: Some(55.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    assert_eq!(report.illumination.relative_illumination_source, ValueSource::Provided);
    assert_relative_eq!(report.illumination.corner_to_center_ratio, 0.55, max_relative = 1e-12);
    assert!(report.flags.potential_vignetting);
}

#[test]
fn invariant_far_limit_infinite_beyond_hyperfocal() {
    let raw = RawInput {
        lens_focal_length_mm: Some(8.0),
        lens_fstop: Some(16.0),
        sensor_pixel_size_width_um: Some(5.0),
        sensor_pixel_size_height_um: Some(5.0),
        working_distance_mm: Some(5000.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    assert_eq!(report.depth_of_field.far_mm, Distance::Infinite);
    assert_eq!(report.depth_of_field.dof_mm, Distance::Infinite);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["depth_of_field"]["far_mm"], "infinite");
    assert_eq!(json["depth_of_field"]["DOF_mm"], "infinite");
}

#[test]
fn invariant_mtf50_source_reported() {
    let derived = report_for(&scenario_a()).diffraction_mtf;
    assert_eq!(derived.lens_mtf50_source, ValueSource::Derived);
    assert_relative_eq!(
        derived.lens_mtf50_lp_per_mm,
        0.5 * derived.diffraction_cutoff_lp_per_mm,
        max_relative = 1e-12
    );

    let raw = RawInput {
        lens_resolution: Some(80.0),
        ..scenario_a()
    };
    let provided = report_for(&raw).diffraction_mtf;
    assert_eq!(provided.lens_mtf50_source, ValueSource::Provided);
    assert_eq!(provided.lens_mtf50_lp_per_mm, 80.0);
    // 80 lp/mm against a 145 lp/mm Nyquist: the lens limits contrast first
    assert!(provided.mtf50_vs_nyquist_ratio < 1.0);
    assert_eq!(provided.sampling_regime, SamplingRegime::OpticsLimitedAberrations);
}

#[test]
fn invariant_motion_axis_selects_density() {
    let raw = RawInput {
        object_motion_axis: Some("h".to_string()),
        sensor_pixel_size_width_um: Some(2.0),
        sensor_pixel_size_height_um: Some(4.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    assert_eq!(report.appearances.appearance_axis_used, MotionAxis::H);
    assert_relative_eq!(
        report.motion_exposure.object_speed_px_s,
        150.0 * report.fov_sampling.pixels_per_mm_y,
        max_relative = 1e-12
    );
    assert_eq!(report.appearances.traversal_extent_mm, report.fov_sampling.fov_height_mm);
}

#[test]
fn invariant_frames_bracket_expected() {
    let appearances = report_for(&scenario_a()).appearances;
    let expected = appearances.expected_frames.limited().unwrap();
    let min = appearances.frames_min.limited().unwrap() as f64;
    let max = appearances.frames_max.limited().unwrap() as f64;
    assert!(min <= expected && expected <= max);
    assert!(max - min <= 1.0);
    // 44.8 mm at 150 mm/s, 60 fps
    assert_relative_eq!(expected, 44.8 / 150.0 * 60.0, max_relative = 1e-9);
    assert_relative_eq!(appearances.displacement_per_frame_mm, 2.5, max_relative = 1e-12);
}

#[test]
fn invariant_target_fov_omitted_when_absent() {
    let json = serde_json::to_value(report_for(&scenario_a())).unwrap();
    assert!(json["fov_sampling"].get("fov_width_actual_vs_target_percent").is_none());

    let raw = RawInput {
        target_fov_width: Some(40.0),
        ..scenario_a()
    };
    let fov = report_for(&raw).fov_sampling;
    assert_relative_eq!(fov.fov_width_actual_vs_target_percent.unwrap(), 112.0, max_relative = 1e-9);
    assert!(fov.fov_height_actual_vs_target_percent.is_none());
}

#[test]
fn invariant_validation_blocks_report() {
    let raw = RawInput {
        lens_focal_length_mm: Some(-25.0),
        ..scenario_a()
    };
    match Calculator::new().calculate(&raw) {
        Err(PipelineError::Validation(e)) => {
            assert!(e.violations.iter().any(|v| v.field == "lens_focal_length_mm"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn invariant_manifest_hash_stable() {
    let calculator = Calculator::new();
    let first = calculator.run(&scenario_a()).unwrap();
    let second = calculator.run(&scenario_a()).unwrap();
    assert_eq!(first.input_hash, second.input_hash);
    assert_eq!(first.report_hash, second.report_hash);
    assert_eq!(
        canonical_json(&first.report).unwrap(),
        canonical_json(&second.report).unwrap()
    );
}

#[test]
fn invariant_huge_pixel_grid_rejected_not_panicking() {
    // 1e10 x 1e10 px overflows a 64-bit total
    let raw = RawInput {
        sensor_width_mm: Some(1e7),
        sensor_height_mm: Some(1e7),
        sensor_pixel_size_width_um: Some(1.0),
        sensor_pixel_size_height_um: Some(1.0),
        ..scenario_a()
    };
    let result = Calculator::new().calculate(&raw);
    assert!(matches!(result, Err(PipelineError::DegenerateGeometry(_))), "{:?}", result);
}

#[test]
fn scenario_a_is_sensor_limited_and_unflagged() {
    let report = report_for(&scenario_a());
    assert_eq!(report.diffraction_mtf.sampling_regime, SamplingRegime::SensorLimited);
    assert!(report.diffraction_mtf.nyquist_over_diffraction_cutoff < 0.9);
    assert!(!report.flags.diffraction_dominant);
    // 1 px of travel takes far less than a 60 fps frame
    assert!(!report.flags.exposure_limited_by_frame);
    assert!(!report.flags.potential_vignetting);
}

#[test]
fn invariant_slow_object_is_frame_limited() {
    let raw = RawInput {
        object_initial_speed_mm_s: Some(0.1),
        ..scenario_a()
    };
    let report = report_for(&raw);
    let one_px = report.motion_exposure.max_exposure_us_motion_blur_1px.limited().unwrap();
    assert!(report.motion_exposure.frame_period_us < one_px);
    assert!(report.flags.exposure_limited_by_frame);
    assert_eq!(report.motion_exposure.recommended_exposure_us, report.motion_exposure.frame_period_us);
}

#[test]
fn scenario_f_small_pixels_stopped_down_are_diffraction_limited() {
    let raw = RawInput {
        lens_fstop: Some(22.0),
        sensor_pixel_size_width_um: Some(1.1),
        sensor_pixel_size_height_um: Some(1.1),
        ..scenario_a()
    };
    let report = report_for(&raw);
    let diffraction = &report.diffraction_mtf;
    assert!(diffraction.nyquist_over_diffraction_cutoff > 1.1);
    assert_eq!(diffraction.sampling_regime, SamplingRegime::OpticsLimitedDiffraction);
    assert!(report.flags.diffraction_dominant);

    let n_eff = 22.0 * (1.0 + 25.0 / 175.0);
    assert_relative_eq!(report.lens_geometry.effective_f_number, n_eff, max_relative = 1e-12);
    assert_relative_eq!(diffraction.airy_disk_diameter_um, 2.44 * 0.55 * n_eff, max_relative = 1e-12);
    assert_relative_eq!(
        diffraction.airy_disk_diameter_pixels,
        2.44 * 0.55 * n_eff / 1.1,
        max_relative = 1e-12
    );
    assert_relative_eq!(diffraction.diffraction_cutoff_lp_per_mm, 1.0 / (0.00055 * n_eff), max_relative = 1e-12);
}

#[test]
fn invariant_airy_pixels_use_tighter_pitch() {
    let raw = RawInput {
        sensor_pixel_size_width_um: Some(4.0),
        sensor_pixel_size_height_um: Some(2.5),
        ..scenario_a()
    };
    let diffraction = report_for(&raw).diffraction_mtf;
    assert_relative_eq!(
        diffraction.airy_disk_diameter_pixels,
        diffraction.airy_disk_diameter_um / 2.5,
        max_relative = 1e-12
    );
}

#[test]
fn scenario_g_matched_optics_are_balanced() {
    // f/11 at m = 1/7 gives N_eff 12.57: cutoff 144.6 lp/mm against a 144.9 lp/mm Nyquist
    let raw = RawInput {
        lens_fstop: Some(11.0),
        lens_resolution: Some(140.0),
        ..scenario_a()
    };
    let diffraction = report_for(&raw).diffraction_mtf;
    let ratio = diffraction.nyquist_over_diffraction_cutoff;
    assert!((0.9..=1.1).contains(&ratio), "ratio {}", ratio);
    assert!(diffraction.mtf50_vs_nyquist_ratio >= 0.9);
    assert_eq!(diffraction.sampling_regime, SamplingRegime::Balanced);
}

#[test]
fn invariant_edge_position_error_from_effective_distortion() {
    let raw = RawInput {
        lens_distortion_perc: Some(2.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    let coverage = &report.coverage_distortion;
    assert!(coverage.coverage_ok);
    assert!(!coverage.distortion_clamped);
    // 8 mm sensor diagonal in an 11 mm image circle
    let effective = 2.0 * 8.0 / 11.0;
    assert_relative_eq!(coverage.effective_distortion_percent_at_actual_edge.unwrap(), effective, max_relative = 1e-9);
    // field diagonal hypot(44.8, 33.6) = 56 mm
    assert_relative_eq!(report.fov_sampling.fov_diagonal_mm, 56.0, max_relative = 1e-9);
    assert_relative_eq!(
        coverage.edge_position_error_mm_effective.unwrap(),
        effective / 100.0 * 28.0,
        max_relative = 1e-9
    );

    let json = serde_json::to_value(report_for(&scenario_a())).unwrap();
    assert!(json["coverage_distortion"].get("edge_position_error_mm_effective").is_none());
}

#[test]
fn invariant_wide_angle_vignettes_inside_image_circle() {
    // 4 mm lens: image plane at 4.08 mm, corner 4 mm off axis
    let raw = RawInput {
        lens_focal_length_mm: Some(4.0),
        ..scenario_a()
    };
    let report = report_for(&raw);
    assert!(report.coverage_distortion.coverage_ok);
    assert_eq!(report.illumination.relative_illumination_source, ValueSource::Derived);
    assert!(report.illumination.corner_to_center_ratio < 0.7);
    assert!(report.flags.potential_vignetting);
}

#[test]
fn invariant_manifest_hashes_resolved_input() {
    let calculator = Calculator::new();
    let explicit = calculator.run(&scenario_a()).unwrap();
    let mirrored = calculator
        .run(&RawInput {
            sensor_pixel_size_height_um: None,
            ..scenario_a()
        })
        .unwrap();
    assert_eq!(explicit.input_hash, mirrored.input_hash);

    let defaulted = calculator
        .run(&RawInput {
            object_motion_axis: None,
            ..scenario_a()
        })
        .unwrap();
    assert_eq!(explicit.input_hash, defaulted.input_hash);

    let slower = calculator
        .run(&RawInput {
            object_initial_speed_mm_s: Some(100.0),
            ..scenario_a()
        })
        .unwrap();
    assert_ne!(explicit.input_hash, slower.input_hash);
}
