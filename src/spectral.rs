//! Windowed spectral analysis of the binned signal.
//!
//! Computes a Hann-windowed one-sided magnitude spectrum via `rustfft`,
//! and keeps the complex spectrum around so the periodicity detector can
//! derive the autocorrelation from the same transform (Wiener-Khinchin:
//! r(tau) = IFFT(|FFT(x)|^2)).

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Spectral analyzer over a fixed-size window.
///
/// All buffers are allocated once at construction; `analyze` performs no
/// heap allocation.
pub struct SpectralAnalyzer {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    hann: Vec<f32>,
    hann_sum: f32,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectralAnalyzer {
    /// Create an analyzer for windows of `size` samples.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let hann = create_hann_window(size);
        let hann_sum = hann.iter().sum();
        Self {
            forward,
            inverse,
            hann,
            hann_sum,
            buf: vec![Complex::default(); size],
            scratch: vec![Complex::default(); scratch_len],
        }
    }

    /// Compute the one-sided magnitude spectrum of `samples` into
    /// `spectrum_out` (length `size / 2`).
    ///
    /// The window mean is removed before windowing: an event-count signal
    /// has a large positive DC component that would otherwise leak over
    /// the rotation peak. Magnitudes are scaled by `2 / sum(hann)` so a
    /// sinusoidal modulation of amplitude A yields a peak of about A.
    ///
    /// The internal complex spectrum is left in place for
    /// [`autocorrelation_into`](Self::autocorrelation_into).
    pub fn analyze(&mut self, samples: &[f32], spectrum_out: &mut [f32]) {
        debug_assert_eq!(samples.len(), self.hann.len());
        debug_assert_eq!(spectrum_out.len(), self.hann.len() / 2);

        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        for ((slot, &sample), &w) in self.buf.iter_mut().zip(samples).zip(&self.hann) {
            *slot = Complex::new((sample - mean) * w, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.buf, &mut self.scratch);

        let scale = 2.0 / self.hann_sum;
        for (out, c) in spectrum_out.iter_mut().zip(&self.buf) {
            *out = c.norm() * scale;
        }
    }

    /// Compute the normalized autocorrelation of the most recently
    /// analyzed window into `lags_out` (length `size / 2`), reusing the
    /// transform left behind by [`analyze`](Self::analyze).
    ///
    /// Values are normalized by the zero-lag term, so `lags_out[0] == 1`
    /// for any non-silent window. A silent window yields all zeros.
    /// Consumes the stored spectrum; call `analyze` again first.
    pub fn autocorrelation_into(&mut self, lags_out: &mut [f32]) {
        debug_assert_eq!(lags_out.len(), self.hann.len() / 2);

        for c in self.buf.iter_mut() {
            *c = Complex::new(c.norm_sqr(), 0.0);
        }
        self.inverse
            .process_with_scratch(&mut self.buf, &mut self.scratch);

        // The unnormalized inverse transform's N factor cancels in the
        // ratio to the zero-lag term.
        let zero_lag = self.buf[0].re;
        if zero_lag <= f32::EPSILON {
            lags_out.fill(0.0);
            return;
        }
        for (out, c) in lags_out.iter_mut().zip(&self.buf) {
            *out = c.re / zero_lag;
        }
    }
}

fn create_hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32;
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}
