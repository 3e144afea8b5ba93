//! Validation System - Input Rules
//!
//! Rules produce structured violations.
//! Any error-severity violation blocks resolution; warnings are logged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{normalize_illumination, MotionAxis, RawInput};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub field: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl ValidationViolation {
    pub fn error(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.to_string(),
            severity: ViolationSeverity::Error,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn warning(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ViolationSeverity::Warning,
            ..Self::error(rule, field, message)
        }
    }

    fn with_bounds(mut self, expected: impl Into<String>, actual: f64) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(format!("{}", actual));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// Error-severity violations only
    pub fn errors(&self) -> Vec<ValidationViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .cloned()
            .collect()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// Input rejected before any computation.
#[derive(Debug, Clone, Error)]
#[error("Validation failed: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<ValidationViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<ValidationViolation>) -> Self {
        Self { violations }
    }
}

fn summarize(violations: &[ValidationViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Fields with no default.
pub struct RequiredFieldsRule;

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &'static str { "required" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        let required = [
            ("sensor_width_mm", input.sensor_width_mm),
            ("sensor_height_mm", input.sensor_height_mm),
            ("sensor_framerate", input.sensor_framerate),
            ("lens_focal_length_mm", input.lens_focal_length_mm),
            ("lens_fstop", input.lens_fstop),
            ("working_distance_mm", input.working_distance_mm),
            ("object_initial_speed_mm_s", input.object_initial_speed_mm_s),
            ("lens_diagonal_mm", input.lens_diagonal_mm),
        ];

        let mut violations: Vec<_> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| ValidationViolation::error(self.name(), field, "required field is missing"))
            .collect();

        if input.sensor_pixel_size_width_um.is_none() && input.sensor_pixel_size_height_um.is_none() {
            violations.push(ValidationViolation::error(
                self.name(),
                "sensor_pixel_size_width_um",
                "at least one pixel pitch axis is required",
            ));
        }

        violations
    }
}

/// Every supplied number must be finite.
pub struct FiniteRule;

impl ValidationRule for FiniteRule {
    fn name(&self) -> &'static str { "finite" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        input
            .numeric_fields()
            .into_iter()
            .filter_map(|(field, value)| value.filter(|v| !v.is_finite()).map(|v| (field, v)))
            .map(|(field, v)| {
                ValidationViolation::error(self.name(), field, "value must be a finite number")
                    .with_bounds("finite", v)
            })
            .collect()
    }
}

/// Physical quantities that must be strictly positive or non-negative.
pub struct PhysicalDomainRule;

impl ValidationRule for PhysicalDomainRule {
    fn name(&self) -> &'static str { "physical_domain" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        let positive = [
            ("sensor_width_mm", input.sensor_width_mm),
            ("sensor_height_mm", input.sensor_height_mm),
            ("sensor_diagonal_mm", input.sensor_diagonal_mm),
            ("sensor_pixel_size_width_um", input.sensor_pixel_size_width_um),
            ("sensor_pixel_size_height_um", input.sensor_pixel_size_height_um),
            ("sensor_framerate", input.sensor_framerate),
            ("lens_focal_length_mm", input.lens_focal_length_mm),
            ("lens_fstop", input.lens_fstop),
            ("lens_diagonal_mm", input.lens_diagonal_mm),
            ("lens_resolution", input.lens_resolution),
            ("working_distance_mm", input.working_distance_mm),
            ("target_fov_width", input.target_fov_width),
            ("target_fov_height", input.target_fov_height),
        ];
        let non_negative = [
            ("object_initial_speed_mm_s", input.object_initial_speed_mm_s),
            ("object_allowed_blur_pixels", input.object_allowed_blur_pixels),
        ];

        let mut violations = vec![];
        for (field, value) in positive {
            if let Some(v) = value.filter(|v| v.is_finite() && *v <= 0.0) {
                violations.push(
                    ValidationViolation::error(self.name(), field, "value must be positive")
                        .with_bounds("> 0", v),
                );
            }
        }
        for (field, value) in non_negative {
            if let Some(v) = value.filter(|v| v.is_finite() && *v < 0.0) {
                violations.push(
                    ValidationViolation::error(self.name(), field, "value must not be negative")
                        .with_bounds(">= 0", v),
                );
            }
        }
        violations
    }
}

pub struct MotionAxisRule;

impl ValidationRule for MotionAxisRule {
    fn name(&self) -> &'static str { "motion_axis" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        match input.object_motion_axis.as_deref().map(str::parse::<MotionAxis>) {
            Some(Err(message)) => vec![ValidationViolation {
                expected: Some("H or W".to_string()),
                actual: input.object_motion_axis.clone(),
                ..ValidationViolation::error(self.name(), "object_motion_axis", message)
            }],
            _ => vec![],
        }
    }
}

/// Datasheet ratios that must stay physical: corner illumination in (0, 100 %],
/// distortion magnitude in [0, 100 %).
pub struct LensDatasheetRule;

impl ValidationRule for LensDatasheetRule {
    fn name(&self) -> &'static str { "lens_datasheet" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        let mut violations = vec![];

        if let Some(raw) = input.lens_relative_illumination.filter(|v| v.is_finite()) {
            let ratio = normalize_illumination(raw);
            if ratio <= 0.0 || ratio > 1.0 {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        "lens_relative_illumination",
                        "relative illumination must be in (0, 1] or (0, 100] percent",
                    )
                    .with_bounds("(0, 1]", raw),
                );
            }
        }

        if let Some(d) = input.lens_distortion_perc.filter(|v| v.is_finite()) {
            if !(0.0..100.0).contains(&d) {
                violations.push(
                    ValidationViolation::error(
                        self.name(),
                        "lens_distortion_perc",
                        "distortion magnitude must be in [0, 100) percent",
                    )
                    .with_bounds("[0, 100)", d),
                );
            }
        }

        violations
    }
}

/// A supplied diagonal that disagrees with width/height is suspicious but usable.
pub struct DiagonalConsistencyRule;

impl ValidationRule for DiagonalConsistencyRule {
    fn name(&self) -> &'static str { "diagonal_consistency" }

    fn validate(&self, input: &RawInput) -> Vec<ValidationViolation> {
        let (Some(w), Some(h), Some(d)) = (input.sensor_width_mm, input.sensor_height_mm, input.sensor_diagonal_mm) else {
            return vec![];
        };
        let expected = w.hypot(h);
        if expected > 0.0 && ((d - expected) / expected).abs() > 0.02 {
            vec![ValidationViolation::warning(
                self.name(),
                "sensor_diagonal_mm",
                format!("diagonal differs from hypot(width, height) = {:.3} mm by more than 2%", expected),
            )
            .with_bounds(format!("{:.3}", expected), d)]
        } else {
            vec![]
        }
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredFieldsRule),
                Box::new(FiniteRule),
                Box::new(PhysicalDomainRule),
                Box::new(MotionAxisRule),
                Box::new(LensDatasheetRule),
                Box::new(DiagonalConsistencyRule),
            ],
        }
    }

    pub fn validate(&self, input: &RawInput) -> ValidationResult {
        let mut all_violations = vec![];

        for rule in &self.rules {
            all_violations.extend(rule.validate(input));
        }

        ValidationResult {
            valid: !all_violations.iter().any(|v| v.severity == ViolationSeverity::Error),
            violations: all_violations,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
