//! Temporal binner: sparse event stream to uniform amplitude signal.

use crate::error::{Error, Result};
use crate::event::DvsEvent;
use crate::FFT_FREQUENCY;

/// Bin duration in microseconds (fractional; boundaries are rounded per
/// index to avoid accumulated drift).
const BIN_PERIOD_US: f64 = 1e6 / FFT_FREQUENCY;

/// Folds timestamped events into fixed-duration bins of `1/FFT_FREQUENCY`
/// seconds, anchored to t = 0.
///
/// Each completed bin's aggregate (event count) is handed to a sink
/// closure at the exact point in the stream where its boundary was
/// crossed, so downstream clocks advance at bin granularity regardless of
/// how the caller batches events.
///
/// A gap in the event stream closes every intervening empty bin, but the
/// catch-up is bounded: after `max_gap_catchup` consecutive empty bins
/// have been emitted individually, the remainder of the gap is collapsed
/// into a single run (`sink(0.0, n)` with `n > 1`) and the bin index
/// jumps ahead arithmetically, so a lone event hours past the previous
/// one costs a bounded amount of work.
pub struct TemporalBinner {
    /// Index of the bin currently accumulating.
    bin_index: u64,
    /// End of the current bin, microseconds.
    next_bin_end_t: u64,
    /// Events accumulated in the current bin.
    count: f32,
    /// Timestamp of the last ingested event.
    last_t: u64,
    /// Consecutive empty bins to emit individually before collapsing.
    max_gap_catchup: u64,
}

impl TemporalBinner {
    pub fn new(max_gap_catchup: u64) -> Self {
        Self {
            bin_index: 0,
            next_bin_end_t: BIN_PERIOD_US.round() as u64,
            count: 0.0,
            last_t: 0,
            max_gap_catchup,
        }
    }

    /// Fold a batch of events into the binned signal, calling
    /// `sink(value, run)` once per completed bin (`run == 1`) or once per
    /// collapsed run of empty bins (`value == 0.0`, `run > 1`).
    ///
    /// The batch is validated up front: any timestamp that decreases
    /// within the batch or relative to the last ingested event rejects
    /// the whole batch with no state change.
    pub fn ingest(&mut self, events: &[DvsEvent], mut sink: impl FnMut(f32, u64)) -> Result<()> {
        self.validate(events)?;
        for event in events {
            let mut empty_run = 0u64;
            while event.t >= self.next_bin_end_t {
                empty_run = if self.count == 0.0 { empty_run + 1 } else { 0 };
                sink(self.count, 1);
                self.count = 0.0;
                self.bin_index += 1;
                self.next_bin_end_t =
                    ((self.bin_index + 1) as f64 * BIN_PERIOD_US).round() as u64;

                if empty_run >= self.max_gap_catchup {
                    let target = bin_containing(event.t);
                    if target > self.bin_index {
                        sink(0.0, target - self.bin_index);
                        self.bin_index = target;
                        self.next_bin_end_t =
                            ((target + 1) as f64 * BIN_PERIOD_US).round() as u64;
                    }
                    break;
                }
            }
            self.count += 1.0;
            self.last_t = event.t;
        }
        Ok(())
    }

    fn validate(&self, events: &[DvsEvent]) -> Result<()> {
        let mut previous = self.last_t;
        for (index, event) in events.iter().enumerate() {
            if event.t < previous {
                tracing::warn!(
                    index,
                    t = event.t,
                    previous,
                    "rejecting batch with non-monotonic timestamps"
                );
                return Err(Error::NonMonotonicTimestamps {
                    index,
                    t: event.t,
                    previous,
                });
            }
            previous = event.t;
        }
        Ok(())
    }
}

/// Index of the bin whose half-open span contains `t`. Starts from the
/// arithmetic estimate and corrects for the per-index boundary rounding.
fn bin_containing(t: u64) -> u64 {
    let mut bin = (t as f64 / BIN_PERIOD_US) as u64;
    while ((bin + 1) as f64 * BIN_PERIOD_US).round() as u64 <= t {
        bin += 1;
    }
    while bin > 0 && (bin as f64 * BIN_PERIOD_US).round() as u64 > t {
        bin -= 1;
    }
    bin
}
