//! Event stream data model.
//!
//! An event camera reports per-pixel brightness changes as a sparse stream
//! of timestamped events. Batches arrive in timestamp order; the pipeline
//! consumes them read-only.

/// Polarity of a brightness change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Polarity {
    /// Brightness decrease.
    Off,
    /// Brightness increase.
    On,
}

/// A single brightness-change event.
///
/// Timestamps are microseconds from the device clock and must be
/// non-decreasing within and across batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DvsEvent {
    /// Timestamp in microseconds.
    pub t: u64,
    /// Pixel column.
    pub x: u16,
    /// Pixel row.
    pub y: u16,
    /// Brightness change direction.
    pub polarity: Polarity,
}

impl DvsEvent {
    /// Create a new event.
    pub const fn new(t: u64, x: u16, y: u16, polarity: Polarity) -> Self {
        Self { t, x, y, polarity }
    }
}
