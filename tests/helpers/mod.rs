//! Shared helpers for pipeline integration tests.

use rotospec::{
    DetectionMarker, DvsEvent, Polarity, RpmPipeline, FFT_FREQUENCY, SPECTRUM_BINS,
};

/// Generate a synthetic event stream whose per-bin event count follows
/// `base + amplitude * sin(2 pi f t)`, with events spread evenly inside
/// each bin. Timestamps are strictly non-decreasing.
pub fn spin_events(frequency_hz: f64, amplitude: f64, base: f64, duration_s: f64) -> Vec<DvsEvent> {
    let bin_period_us = 1e6 / FFT_FREQUENCY;
    let bin_count = (duration_s * FFT_FREQUENCY) as u64;
    let mut events = Vec::new();
    for bin in 0..bin_count {
        let start = (bin as f64 * bin_period_us).round() as u64;
        let end = ((bin + 1) as f64 * bin_period_us).round() as u64;
        let t_center = (bin as f64 + 0.5) / FFT_FREQUENCY;
        let modulation = (2.0 * std::f64::consts::PI * frequency_hz * t_center).sin();
        let count = (base + amplitude * modulation).round().max(0.0) as u64;
        for j in 0..count {
            let t = start + j * (end - start) / count;
            let polarity = if j % 2 == 0 { Polarity::On } else { Polarity::Off };
            events.push(DvsEvent::new(t, (j % 64) as u16, (bin % 64) as u16, polarity));
        }
    }
    events
}

/// Pipeline plus its caller-owned display buffers.
pub struct Harness {
    pub pipeline: RpmPipeline,
    pub spectrum: [f32; SPECTRUM_BINS],
    pub autocorrelation: [f32; SPECTRUM_BINS],
    pub detection: DetectionMarker,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            pipeline: RpmPipeline::new(),
            spectrum: [0.0; SPECTRUM_BINS],
            autocorrelation: [0.0; SPECTRUM_BINS],
            detection: DetectionMarker::NONE,
        }
    }

    /// Feed events in batches of `chunk` and collect every emitted RPM
    /// sample in order. Panics on a malformed batch.
    pub fn feed_chunked(
        &mut self,
        events: &[DvsEvent],
        chunk: usize,
        amplitude_threshold: f32,
        autocorrelation_threshold: f32,
        frequency_divider: u32,
    ) -> Vec<f64> {
        let mut collected = Vec::new();
        for batch in events.chunks(chunk.max(1)) {
            let out = self
                .pipeline
                .process(
                    batch,
                    &mut self.spectrum,
                    &mut self.autocorrelation,
                    &mut self.detection,
                    amplitude_threshold,
                    autocorrelation_threshold,
                    frequency_divider,
                )
                .expect("well-formed batch");
            if let Some(rpms) = out {
                collected.extend_from_slice(rpms);
            }
        }
        collected
    }

    /// Feed the whole stream as a single batch.
    pub fn feed(
        &mut self,
        events: &[DvsEvent],
        amplitude_threshold: f32,
        autocorrelation_threshold: f32,
        frequency_divider: u32,
    ) -> Vec<f64> {
        self.feed_chunked(
            events,
            events.len().max(1),
            amplitude_threshold,
            autocorrelation_threshold,
            frequency_divider,
        )
    }
}
