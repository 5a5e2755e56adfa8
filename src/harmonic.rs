//! Harmonic resolution: from dominant peak to true rotation frequency.
//!
//! Rotational symmetry (e.g. N identical blades) makes the dominant
//! spectral peak sit at N times the true rotation frequency. A
//! caller-supplied divider compensates; a detection is only accepted
//! when the spectral and autocorrelation analyses agree on the period.

use crate::periodicity::DetectionMarker;
use crate::{FFT_FREQUENCY, FREQUENCY_RESOLUTION};

/// Dominant bin of a one-sided magnitude spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Bin index (frequency = bin * [`FREQUENCY_RESOLUTION`]).
    pub bin: usize,
    /// Magnitude at that bin.
    pub magnitude: f32,
}

/// Find the dominant spectral bin, excluding DC.
pub fn find_spectral_peak(spectrum: &[f32]) -> SpectralPeak {
    let mut peak = SpectralPeak {
        bin: 0,
        magnitude: 0.0,
    };
    for (bin, &magnitude) in spectrum.iter().enumerate().skip(1) {
        if magnitude > peak.magnitude {
            peak.bin = bin;
            peak.magnitude = magnitude;
        }
    }
    peak
}

/// Cross-validate the spectral peak against a confirmed autocorrelation
/// lag and resolve harmonics.
///
/// Acceptance requires both tests (spec'd as an AND):
/// - the spectral magnitude exceeds `amplitude_threshold`;
/// - the autocorrelation lag matches the spectral period, within one lag
///   or within one spectral bin ([`FREQUENCY_RESOLUTION`]), whichever
///   axis resolves finer at that frequency.
///
/// On acceptance the rotation frequency is the spectral frequency divided
/// by `frequency_divider` (1 disables harmonic compensation).
pub fn resolve(
    peak: SpectralPeak,
    marker: DetectionMarker,
    amplitude_threshold: f32,
    frequency_divider: u32,
) -> Option<f64> {
    if !marker.is_confirmed() || peak.bin == 0 {
        return None;
    }
    if peak.magnitude <= amplitude_threshold {
        return None;
    }

    let spectral_frequency = peak.bin as f64 * FREQUENCY_RESOLUTION;
    let lag = marker.position as f64;
    let lag_frequency = FFT_FREQUENCY / lag;
    let expected_lag = FFT_FREQUENCY / spectral_frequency;

    let period_match = (lag - expected_lag).abs() <= 1.0;
    let frequency_match = (lag_frequency - spectral_frequency).abs() <= FREQUENCY_RESOLUTION;
    if !period_match && !frequency_match {
        return None;
    }

    Some(spectral_frequency / frequency_divider as f64)
}
