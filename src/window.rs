//! Sliding window store for the binned amplitude signal.

/// Fixed-capacity circular buffer holding the most recent window of
/// binned samples.
///
/// Zero-filled at construction: until the first full fill, analyses run
/// on a zero-padded window (cold-start policy). After that the buffer
/// always holds exactly the last `capacity` samples, oldest overwritten
/// first.
pub struct SampleWindow {
    samples: Vec<f32>,
    /// Index of the oldest sample (next slot to overwrite).
    head: usize,
}

impl SampleWindow {
    /// Create a zero-filled window of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity],
            head: 0,
        }
    }

    /// Number of samples the window holds.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Overwrite the oldest slot with a new sample.
    pub fn push(&mut self, value: f32) {
        self.samples[self.head] = value;
        self.head = (self.head + 1) % self.samples.len();
    }

    /// Copy the window into `out` in chronological order (oldest first).
    ///
    /// `out` must have the same length as the window.
    pub fn fill_chronological(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.samples.len());
        let tail_len = self.samples.len() - self.head;
        out[..tail_len].copy_from_slice(&self.samples[self.head..]);
        out[tail_len..].copy_from_slice(&self.samples[..self.head]);
    }
}
