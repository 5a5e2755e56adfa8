//! Error types for rotospec.

use thiserror::Error;

/// Error type for pipeline operations.
///
/// Out-of-range thresholds and divider values are clamped rather than
/// rejected (they are adjusted live by a user); only input that would
/// corrupt the binned signal is an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("non-monotonic timestamp at batch index {index}: {t} us after {previous} us")]
    NonMonotonicTimestamps {
        /// Position of the offending event within the batch.
        index: usize,
        /// Timestamp of the offending event.
        t: u64,
        /// Timestamp it would have to follow.
        previous: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
