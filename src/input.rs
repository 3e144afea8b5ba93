//! Input Resolution - Raw Fields to Resolved Snapshot
//!
//! `resolve` is total: it either returns a fully populated `InputSnapshot`
//! or a `ValidationError` listing every problem. Each defaulting rule is an
//! independent substitution applied once.

use std::fmt;
use std::str::FromStr;

use log::{info, warn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::policy::{DEFAULT_ALLOWED_BLUR_PX, ILLUMINATION_PERCENT_THRESHOLD};
use crate::quantity::{Sourced, ValueSource};
use crate::validation::{ValidationError, ValidationViolation, Validator};

/// Raw input mapping as read from JSON.
///
/// Every field is optional at this stage; `resolve` decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_width_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_height_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_diagonal_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_pixel_size_width_um: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_pixel_size_height_um: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sensor_framerate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_focal_length_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_fstop: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_diagonal_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_distortion_perc: Option<f64>,
    /// Datasheet MTF50, lp/mm
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_resolution: Option<f64>,
    /// Corner relative illumination, as a ratio or a percentage
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lens_relative_illumination: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub working_distance_mm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub target_fov_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub target_fov_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub object_allowed_blur_pixels: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub object_initial_speed_mm_s: Option<f64>,
    #[serde(default)]
    pub object_motion_axis: Option<String>,
}

impl RawInput {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// All numeric fields with their external names, in declaration order.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 17] {
        [
            ("sensor_width_mm", self.sensor_width_mm),
            ("sensor_height_mm", self.sensor_height_mm),
            ("sensor_diagonal_mm", self.sensor_diagonal_mm),
            ("sensor_pixel_size_width_um", self.sensor_pixel_size_width_um),
            ("sensor_pixel_size_height_um", self.sensor_pixel_size_height_um),
            ("sensor_framerate", self.sensor_framerate),
            ("lens_focal_length_mm", self.lens_focal_length_mm),
            ("lens_fstop", self.lens_fstop),
            ("lens_diagonal_mm", self.lens_diagonal_mm),
            ("lens_distortion_perc", self.lens_distortion_perc),
            ("lens_resolution", self.lens_resolution),
            ("lens_relative_illumination", self.lens_relative_illumination),
            ("working_distance_mm", self.working_distance_mm),
            ("target_fov_width", self.target_fov_width),
            ("target_fov_height", self.target_fov_height),
            ("object_allowed_blur_pixels", self.object_allowed_blur_pixels),
            ("object_initial_speed_mm_s", self.object_initial_speed_mm_s),
        ]
    }
}

/// Accepts a JSON number, a numeric string, or null.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(v)) => Ok(Some(v)),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, got {:?}", text))),
    }
}

/// Direction of object travel across the field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAxis {
    /// Along the sensor height
    H,
    /// Along the sensor width
    W,
}

impl Default for MotionAxis {
    fn default() -> Self {
        Self::W
    }
}

impl FromStr for MotionAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(Self::H),
            "W" => Ok(Self::W),
            other => Err(format!("motion axis must be H or W, got {:?}", other)),
        }
    }
}

impl fmt::Display for MotionAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H => write!(f, "H"),
            Self::W => write!(f, "W"),
        }
    }
}

/// Fully resolved, immutable input.
///
/// Invariants: both pitch axes and the sensor diagonal are present, the
/// motion axis is one of {H, W}, and every number is finite and in domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSnapshot {
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub sensor_diagonal_mm: Sourced<f64>,
    pub pixel_pitch_width_um: Sourced<f64>,
    pub pixel_pitch_height_um: Sourced<f64>,
    pub framerate_fps: f64,
    pub focal_length_mm: f64,
    pub f_number: f64,
    pub lens_diagonal_mm: f64,
    pub lens_distortion_percent: Option<f64>,
    /// `None` means derive from the diffraction cutoff
    pub lens_mtf50_lp_per_mm: Option<f64>,
    /// Corner-to-center ratio in (0, 1]; `None` means derive via cos⁴
    pub lens_relative_illumination: Option<f64>,
    pub working_distance_mm: f64,
    pub object_speed_mm_s: f64,
    pub allowed_blur_px: f64,
    pub motion_axis: MotionAxis,
    pub target_fov_width_mm: Option<f64>,
    pub target_fov_height_mm: Option<f64>,
}

impl InputSnapshot {
    /// Tighter of the two pixel pitches, µm. The binding sampling constraint.
    pub fn min_pitch_um(&self) -> f64 {
        self.pixel_pitch_width_um
            .value()
            .min(self.pixel_pitch_height_um.value())
    }

    pub fn min_pitch_mm(&self) -> f64 {
        self.min_pitch_um() / 1000.0
    }
}

/// Resolve raw fields with the default rule set.
pub fn resolve(raw: &RawInput) -> Result<InputSnapshot, ValidationError> {
    resolve_with(raw, &Validator::default())
}

/// Resolve raw fields, validating with the given rule set first.
pub fn resolve_with(raw: &RawInput, validator: &Validator) -> Result<InputSnapshot, ValidationError> {
    let result = validator.validate(raw);
    for v in result.warnings() {
        warn!("input {}: {}", v.field, v.message);
    }
    if !result.valid {
        return Err(ValidationError::new(result.errors()));
    }

    // RequiredFieldsRule and MotionAxisRule reject everything `build_snapshot` cannot resolve.
    let snapshot = build_snapshot(raw).ok_or_else(|| {
        ValidationError::new(vec![ValidationViolation::error(
            "resolve",
            "input",
            "input passed validation but could not be resolved",
        )])
    })?;

    if snapshot.sensor_diagonal_mm.source() == ValueSource::Derived {
        info!(
            "sensor_diagonal_mm derived from width/height: {:.4} mm",
            snapshot.sensor_diagonal_mm.value()
        );
    }

    Ok(snapshot)
}

/// Apply mirroring, derivation and defaults. `None` when a required field is absent.
fn build_snapshot(raw: &RawInput) -> Option<InputSnapshot> {
    let sensor_width_mm = raw.sensor_width_mm?;
    let sensor_height_mm = raw.sensor_height_mm?;

    let sensor_diagonal_mm = match raw.sensor_diagonal_mm {
        Some(d) => Sourced::Provided(d),
        None => Sourced::Derived(sensor_width_mm.hypot(sensor_height_mm)),
    };

    let (pixel_pitch_width_um, pixel_pitch_height_um) = match (
        raw.sensor_pixel_size_width_um,
        raw.sensor_pixel_size_height_um,
    ) {
        (Some(w), Some(h)) => (Sourced::Provided(w), Sourced::Provided(h)),
        (Some(w), None) => (Sourced::Provided(w), Sourced::Derived(w)),
        (None, Some(h)) => (Sourced::Derived(h), Sourced::Provided(h)),
        (None, None) => return None,
    };

    let motion_axis = match raw.object_motion_axis.as_deref() {
        Some(text) => text.parse::<MotionAxis>().ok()?,
        None => MotionAxis::default(),
    };

    Some(InputSnapshot {
        sensor_width_mm,
        sensor_height_mm,
        sensor_diagonal_mm,
        pixel_pitch_width_um,
        pixel_pitch_height_um,
        framerate_fps: raw.sensor_framerate?,
        focal_length_mm: raw.lens_focal_length_mm?,
        f_number: raw.lens_fstop?,
        lens_diagonal_mm: raw.lens_diagonal_mm?,
        lens_distortion_percent: raw.lens_distortion_perc,
        lens_mtf50_lp_per_mm: raw.lens_resolution,
        lens_relative_illumination: raw.lens_relative_illumination.map(normalize_illumination),
        working_distance_mm: raw.working_distance_mm?,
        object_speed_mm_s: raw.object_initial_speed_mm_s?,
        allowed_blur_px: raw.object_allowed_blur_pixels.unwrap_or(DEFAULT_ALLOWED_BLUR_PX),
        motion_axis,
        target_fov_width_mm: raw.target_fov_width,
        target_fov_height_mm: raw.target_fov_height,
    })
}

/// Percent values (above the detection threshold) become ratios.
pub fn normalize_illumination(value: f64) -> f64 {
    if value > ILLUMINATION_PERCENT_THRESHOLD {
        value / 100.0
    } else {
        value
    }
}
