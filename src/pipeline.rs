//! Rate-synchronized RPM estimation pipeline.
//!
//! Drives the binner, window store, spectral analyzer, periodicity
//! detector, and harmonic resolver from a single `process` entry point,
//! and keeps the output cadence locked to `SAMPLING_FREQUENCY` in
//! binned-signal time regardless of how the caller batches events.

use crate::binner::TemporalBinner;
use crate::error::Result;
use crate::event::DvsEvent;
use crate::harmonic::{self, find_spectral_peak};
use crate::periodicity::{self, DetectionMarker};
use crate::spectral::SpectralAnalyzer;
use crate::window::SampleWindow;
use crate::{FFT_FREQUENCY, FFT_SAMPLES, SAMPLING_FREQUENCY, SPECTRUM_BINS};

/// Bins per analysis tick (~51.2; boundaries are rounded per tick index).
const BINS_PER_TICK: f64 = FFT_FREQUENCY / SAMPLING_FREQUENCY;

/// Empty bins emitted individually before the binner collapses a gap:
/// one full window of zeros plus at least one analysis interval. Past
/// that point the window is all zeros and every further tick writes the
/// same zeroed buffers, clears the marker, and emits nothing, so the
/// remainder can be skipped arithmetically.
const GAP_CATCHUP_BINS: u64 = FFT_SAMPLES as u64 + BINS_PER_TICK as u64 + 1;

/// RPM estimation pipeline over an asynchronous event stream.
///
/// One instance per acquisition session. All buffers are allocated at
/// construction; `process` performs no heap allocation in steady state.
/// Single-consumer: drive it from one acquisition thread.
pub struct RpmPipeline {
    binner: TemporalBinner,
    window: SampleWindow,
    analyzer: SpectralAnalyzer,
    /// Chronological copy of the window for analysis.
    window_scratch: Vec<f32>,
    /// Completed bins over the session.
    total_bins: u64,
    /// Analysis ticks fired over the session.
    tick_index: u64,
    /// Bin count at which the next tick fires.
    next_tick_bins: u64,
    /// RPM samples produced by the current call; cleared on entry.
    rpms: Vec<f64>,
}

impl RpmPipeline {
    pub fn new() -> Self {
        Self {
            binner: TemporalBinner::new(GAP_CATCHUP_BINS),
            window: SampleWindow::new(FFT_SAMPLES),
            analyzer: SpectralAnalyzer::new(FFT_SAMPLES),
            window_scratch: vec![0.0; FFT_SAMPLES],
            total_bins: 0,
            tick_index: 0,
            next_tick_bins: bins_for_tick(0),
            rpms: Vec::new(),
        }
    }

    /// Feed a batch of events through the pipeline.
    ///
    /// Runs one spectral + periodicity analysis per `1/SAMPLING_FREQUENCY`
    /// interval of binned-signal time crossed by this batch (zero or
    /// many), overwriting `spectrum_out`, `autocorrelation_out`, and
    /// `detection_out` in place on each tick. Accepted detections append
    /// `frequency * 60` to the returned sequence; `None` means no new
    /// samples this call.
    ///
    /// Thresholds and divider are clamped to their documented ranges
    /// (they are adjusted live). A batch with decreasing timestamps is
    /// rejected whole, with no state change.
    #[allow(clippy::too_many_arguments)]
    pub fn process<'a>(
        &'a mut self,
        events: &[DvsEvent],
        spectrum_out: &mut [f32; SPECTRUM_BINS],
        autocorrelation_out: &mut [f32; SPECTRUM_BINS],
        detection_out: &mut DetectionMarker,
        amplitude_threshold: f32,
        autocorrelation_threshold: f32,
        frequency_divider: u32,
    ) -> Result<Option<&'a [f64]>> {
        let amplitude_threshold = amplitude_threshold.max(0.0);
        let autocorrelation_threshold = autocorrelation_threshold.clamp(0.0, 1.0);
        let frequency_divider = frequency_divider.max(1);

        self.rpms.clear();

        let Self {
            binner,
            window,
            analyzer,
            window_scratch,
            total_bins,
            tick_index,
            next_tick_bins,
            rpms,
        } = self;

        binner.ingest(events, |bin_value, run| {
            if run > 1 {
                // Collapsed gap remainder: the window is already all
                // zeros (the binner emits a full window of empty bins
                // before collapsing), so the skipped ticks' outputs are
                // already in the caller's buffers. Advance the clocks
                // only.
                *total_bins += run;
                while *total_bins >= *next_tick_bins {
                    *tick_index += 1;
                    *next_tick_bins = bins_for_tick(*tick_index);
                }
                return;
            }

            window.push(bin_value);
            *total_bins += 1;

            // Evaluated per bin, so a batch spanning several intervals
            // runs one analysis per boundary and skips no output tick.
            while *total_bins >= *next_tick_bins {
                window.fill_chronological(window_scratch);
                analyzer.analyze(window_scratch, spectrum_out);
                analyzer.autocorrelation_into(autocorrelation_out);

                let marker =
                    periodicity::find_peak(autocorrelation_out, autocorrelation_threshold);
                let peak = find_spectral_peak(spectrum_out);

                match harmonic::resolve(peak, marker, amplitude_threshold, frequency_divider) {
                    Some(frequency) => {
                        let rpm = frequency * 60.0;
                        tracing::debug!(frequency, rpm, "confirmed rotation estimate");
                        *detection_out = marker;
                        rpms.push(rpm);
                    }
                    None => {
                        *detection_out = DetectionMarker::NONE;
                    }
                }

                *tick_index += 1;
                *next_tick_bins = bins_for_tick(*tick_index);
            }
        })?;

        if self.rpms.is_empty() {
            Ok(None)
        } else {
            Ok(Some(&self.rpms))
        }
    }
}

impl Default for RpmPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Bin count at which analysis tick `tick` fires. Rounded per index
/// rather than accumulated, so the long-run output rate is exactly
/// `SAMPLING_FREQUENCY` despite the fractional bins-per-tick ratio.
fn bins_for_tick(tick: u64) -> u64 {
    ((tick + 1) as f64 * BINS_PER_TICK).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Polarity;

    fn event(t: u64) -> DvsEvent {
        DvsEvent::new(t, 0, 0, Polarity::On)
    }

    fn buffers() -> ([f32; SPECTRUM_BINS], [f32; SPECTRUM_BINS], DetectionMarker) {
        ([0.0; SPECTRUM_BINS], [0.0; SPECTRUM_BINS], DetectionMarker::NONE)
    }

    #[test]
    fn test_tick_boundaries_average_51_2_bins() {
        // 100 ticks over exactly 5120 bins: no drift from rounding.
        assert_eq!(bins_for_tick(0), 51);
        assert_eq!(bins_for_tick(1), 102);
        assert_eq!(bins_for_tick(99), 5120);
    }

    #[test]
    fn test_empty_batch_returns_none() {
        let mut pipeline = RpmPipeline::new();
        let (mut spectrum, mut autocorr, mut detection) = buffers();
        let out = pipeline
            .process(&[], &mut spectrum, &mut autocorr, &mut detection, 10.0, 0.4, 1)
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_short_batch_fires_no_tick() {
        let mut pipeline = RpmPipeline::new();
        let (mut spectrum, mut autocorr, mut detection) = buffers();
        // Well under 51 bins of signal time.
        let events: Vec<_> = (0..100).map(|i| event(i * 100)).collect();
        let out = pipeline
            .process(&events, &mut spectrum, &mut autocorr, &mut detection, 10.0, 0.4, 1)
            .unwrap();
        assert!(out.is_none());
        assert!(spectrum.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_malformed_batch_propagates_error() {
        let mut pipeline = RpmPipeline::new();
        let (mut spectrum, mut autocorr, mut detection) = buffers();
        let result = pipeline.process(
            &[event(1000), event(500)],
            &mut spectrum,
            &mut autocorr,
            &mut detection,
            10.0,
            0.4,
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_divider_zero_is_clamped_to_one() {
        let mut pipeline = RpmPipeline::new();
        let (mut spectrum, mut autocorr, mut detection) = buffers();
        // Must not divide by zero; a sparse stream past one tick suffices
        // to exercise the analysis path.
        let events: Vec<_> = (0..200).map(|i| event(i * 1000)).collect();
        let out = pipeline
            .process(&events, &mut spectrum, &mut autocorr, &mut detection, -5.0, 2.0, 0)
            .unwrap();
        // Uniform rate: no periodicity, so no samples either way.
        assert!(out.is_none());
    }
}
