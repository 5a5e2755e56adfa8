//! Periodicity detection over the normalized autocorrelation.

/// Result of a periodicity search, written in place for display overlays.
///
/// `position` is the autocorrelation lag of the confirmed peak (same
/// index axis as the spectrum and autocorrelation buffers); `position ==
/// -1` is the sentinel meaning no confirmed periodicity this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DetectionMarker {
    /// Peak lag, or -1 when nothing was confirmed.
    pub position: f32,
    /// Normalized autocorrelation value at the peak.
    pub value: f32,
}

impl DetectionMarker {
    /// Sentinel marker: no confirmed periodicity.
    pub const NONE: Self = Self {
        position: -1.0,
        value: 0.0,
    };

    /// Whether this marker carries a confirmed detection.
    pub fn is_confirmed(&self) -> bool {
        self.position >= 0.0
    }
}

/// Search the normalized autocorrelation for a periodicity peak.
///
/// Lag 0 is always maximal and excluded. The search starts after the
/// first negative-going zero crossing: for any signal oversampled
/// relative to its period the first few lags stay close to 1 and a bare
/// global maximum would always land on lag 1. Past that point the global
/// maximum is taken and confirmed against `threshold` (normalized, 0-1).
pub fn find_peak(lags: &[f32], threshold: f32) -> DetectionMarker {
    let mut start = None;
    for (lag, &value) in lags.iter().enumerate().skip(1) {
        if value < 0.0 {
            start = Some(lag);
            break;
        }
    }
    // Never went negative: no oscillation in the window.
    let Some(start) = start else {
        return DetectionMarker::NONE;
    };

    let mut best_lag = 0;
    let mut best_value = f32::MIN;
    for (lag, &value) in lags.iter().enumerate().skip(start) {
        if value > best_value {
            best_value = value;
            best_lag = lag;
        }
    }

    if best_lag > 0 && best_value > threshold {
        DetectionMarker {
            position: best_lag as f32,
            value: best_value,
        }
    } else {
        DetectionMarker::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Damped cosine: the shape of a periodic signal's windowed
    /// autocorrelation.
    fn damped_cosine(len: usize, period: f32) -> Vec<f32> {
        (0..len)
            .map(|lag| {
                let envelope = 1.0 - lag as f32 / len as f32;
                envelope * (2.0 * std::f32::consts::PI * lag as f32 / period).cos()
            })
            .collect()
    }

    #[test]
    fn test_finds_first_full_period() {
        let lags = damped_cosine(512, 102.4);
        let marker = find_peak(&lags, 0.4);
        assert!(marker.is_confirmed());
        let lag = marker.position as usize;
        assert!(
            (100..=105).contains(&lag),
            "expected peak near lag 102, got {}",
            lag
        );
        assert!(marker.value > 0.4);
    }

    #[test]
    fn test_does_not_lock_onto_small_lags() {
        // Values near lag 1 are ~1.0 but precede the zero crossing.
        let lags = damped_cosine(512, 102.4);
        let marker = find_peak(&lags, 0.1);
        assert!(marker.position as usize > 50);
    }

    #[test]
    fn test_below_threshold_yields_sentinel() {
        let lags = damped_cosine(512, 102.4);
        let marker = find_peak(&lags, 0.99);
        assert_eq!(marker, DetectionMarker::NONE);
    }

    #[test]
    fn test_flat_signal_yields_sentinel() {
        let lags = vec![0.0f32; 512];
        assert_eq!(find_peak(&lags, 0.1), DetectionMarker::NONE);
        let positive = vec![0.5f32; 512];
        assert_eq!(find_peak(&positive, 0.1), DetectionMarker::NONE);
    }
}
