//! Diffraction limit, lens MTF and the sampling regime.
//!
//! Compares what the optics can pass (diffraction cutoff, MTF50) with
//! what the pixel grid can represent (Nyquist).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::geometry::GeometryResult;
use crate::input::InputSnapshot;
use crate::policy::{
    AIRY_DIAMETER_FACTOR, BALANCED_BAND_HIGH, BALANCED_BAND_LOW, MTF50_CUTOFF_FRACTION, WAVELENGTH_UM,
};
use crate::quantity::{Sourced, ValueSource};
use crate::sampling::SensorResult;

/// Which side of the optics/sensor pair limits resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingRegime {
    /// Airy disk larger than the pixel grid can resolve
    OpticsLimitedDiffraction,
    /// Lens MTF50 falls short of Nyquist
    OpticsLimitedAberrations,
    /// Optics pass detail the pixels cannot sample
    SensorLimited,
    Balanced,
}

impl SamplingRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpticsLimitedDiffraction => "optics-limited (diffraction)",
            Self::OpticsLimitedAberrations => "optics-limited (aberrations)",
            Self::SensorLimited => "sensor-limited",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for SamplingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SamplingRegime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffractionMtfResult {
    pub wavelength_um: f64,
    pub airy_disk_diameter_um: f64,
    pub airy_disk_diameter_pixels: f64,
    pub diffraction_cutoff_lp_per_mm: f64,
    pub sensor_nyquist_lp_per_mm: f64,
    pub nyquist_over_diffraction_cutoff: f64,
    pub lens_mtf50_lp_per_mm: f64,
    pub lens_mtf50_source: ValueSource,
    pub mtf50_vs_nyquist_ratio: f64,
    pub sampling_regime: SamplingRegime,
}

/// Incoherent diffraction cutoff `1/(λ·N)`, lp/mm.
pub fn diffraction_cutoff_lp_per_mm(wavelength_um: f64, f_number: f64) -> f64 {
    1.0 / (wavelength_um / 1000.0 * f_number)
}

/// Classify the optics/sensor balance.
///
/// Diffraction is checked first, then lens aberrations, then the sensor;
/// whatever survives sits inside the balanced band.
pub fn classify(nyquist_over_cutoff: f64, mtf50: f64, nyquist: f64) -> SamplingRegime {
    if nyquist_over_cutoff > BALANCED_BAND_HIGH {
        SamplingRegime::OpticsLimitedDiffraction
    } else if mtf50 < BALANCED_BAND_LOW * nyquist {
        SamplingRegime::OpticsLimitedAberrations
    } else if nyquist_over_cutoff < BALANCED_BAND_LOW {
        SamplingRegime::SensorLimited
    } else {
        SamplingRegime::Balanced
    }
}

pub fn compute(input: &InputSnapshot, geometry: &GeometryResult, sensor: &SensorResult) -> DiffractionMtfResult {
    let n_eff = geometry.effective_f_number;
    let pitch_um = input.min_pitch_um();
    let nyquist = sensor.sensor_nyquist_lp_per_mm;

    let airy_um = AIRY_DIAMETER_FACTOR * WAVELENGTH_UM * n_eff;
    let cutoff = diffraction_cutoff_lp_per_mm(WAVELENGTH_UM, n_eff);
    let ratio = nyquist / cutoff;

    let mtf50 = match input.lens_mtf50_lp_per_mm {
        Some(v) => Sourced::Provided(v),
        None => Sourced::Derived(MTF50_CUTOFF_FRACTION * cutoff),
    };

    DiffractionMtfResult {
        wavelength_um: WAVELENGTH_UM,
        airy_disk_diameter_um: airy_um,
        airy_disk_diameter_pixels: airy_um / pitch_um,
        diffraction_cutoff_lp_per_mm: cutoff,
        sensor_nyquist_lp_per_mm: nyquist,
        nyquist_over_diffraction_cutoff: ratio,
        lens_mtf50_lp_per_mm: mtf50.value(),
        lens_mtf50_source: mtf50.source(),
        mtf50_vs_nyquist_ratio: mtf50.value() / nyquist,
        sampling_regime: classify(ratio, mtf50.value(), nyquist),
    }
}
