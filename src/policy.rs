//! Policy Constants
//!
//! Fixed thresholds and reference values. These are not inputs.

/// Reference wavelength for diffraction figures (visible green), µm.
pub const WAVELENGTH_UM: f64 = 0.55;

/// Airy disk diameter factor: `d = 2.44 · λ · N`.
pub const AIRY_DIAMETER_FACTOR: f64 = 2.44;

/// Heuristic lens MTF50 as a fraction of the diffraction cutoff,
/// used when no datasheet resolution is given.
pub const MTF50_CUTOFF_FRACTION: f64 = 0.5;

/// Lower edge of the "balanced" band for Nyquist / cutoff and MTF50 / Nyquist.
pub const BALANCED_BAND_LOW: f64 = 0.9;

/// Upper edge of the "balanced" band for Nyquist / cutoff.
pub const BALANCED_BAND_HIGH: f64 = 1.1;

/// Nyquist / cutoff above which diffraction is flagged as dominant.
pub const DIFFRACTION_DOMINANT_RATIO: f64 = 1.0;

/// Corner-to-center illumination ratio below which vignetting is flagged.
pub const VIGNETTING_CORNER_RATIO: f64 = 0.7;

/// Blur budget (pixels) for the recommended exposure. Always 1 px.
pub const RECOMMENDED_BLUR_PX: f64 = 1.0;

/// Allowed blur used when the input does not state one, px.
pub const DEFAULT_ALLOWED_BLUR_PX: f64 = 1.0;

/// Relative illumination values above this are read as percent.
pub const ILLUMINATION_PERCENT_THRESHOLD: f64 = 1.5;
