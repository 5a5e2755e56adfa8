//! # rotospec
//!
//! Real-time rotational speed (RPM) estimation from an asynchronous
//! event-camera stream.
//!
//! A spinning object imprints a quasi-periodic modulation on the
//! aggregate event rate. This crate extracts it with a fixed pipeline:
//!
//! - **Temporal binning**: sparse events folded into a uniform 512 Hz
//!   amplitude signal
//! - **Sliding window**: the most recent 1024 bins (2 s), circularly
//!   overwritten
//! - **Spectral analysis**: Hann-windowed one-sided magnitude spectrum
//! - **Periodicity detection**: normalized autocorrelation with peak
//!   confirmation
//! - **Harmonic resolution**: divider compensation for rotational
//!   symmetry (e.g. blade count)
//! - **Rate-synchronized emission**: RPM samples at a fixed 10 Hz in
//!   signal time, however irregularly events are delivered
//!
//! The pipeline is a synchronous, single-consumer computational unit: no
//! threads, no I/O, no per-call allocation in steady state. Display
//! buffers (spectrum, autocorrelation, detection marker) are caller-owned
//! and overwritten in place.
//!
//! ## Example
//!
//! ```rust
//! use rotospec::{DetectionMarker, DvsEvent, Polarity, RpmPipeline, SPECTRUM_BINS};
//!
//! let mut pipeline = RpmPipeline::new();
//! let mut spectrum = [0.0f32; SPECTRUM_BINS];
//! let mut autocorrelation = [0.0f32; SPECTRUM_BINS];
//! let mut detection = DetectionMarker::NONE;
//!
//! let events = [DvsEvent::new(100, 3, 4, Polarity::On)];
//! let rpms = pipeline
//!     .process(
//!         &events,
//!         &mut spectrum,
//!         &mut autocorrelation,
//!         &mut detection,
//!         10.0, // amplitude threshold
//!         0.4,  // autocorrelation threshold
//!         1,    // frequency divider
//!     )
//!     .unwrap();
//! assert!(rpms.is_none()); // under one analysis interval of signal time
//! ```

pub mod binner;
pub mod error;
pub mod event;
pub mod harmonic;
pub mod periodicity;
pub mod pipeline;
pub mod spectral;
pub mod window;

pub use error::Error;
pub use event::{DvsEvent, Polarity};
pub use harmonic::SpectralPeak;
pub use periodicity::DetectionMarker;
pub use pipeline::RpmPipeline;

/// Samples per analysis window.
pub const FFT_SAMPLES: usize = 1024;

/// Internal sample rate of the binned signal, Hz.
pub const FFT_FREQUENCY: f64 = 512.0;

/// Nominal RPM output rate in binned-signal time, Hz.
pub const SAMPLING_FREQUENCY: f64 = 10.0;

/// Length of the one-sided spectrum and autocorrelation buffers.
pub const SPECTRUM_BINS: usize = FFT_SAMPLES / 2;

/// Width of one spectral bin, Hz.
pub const FREQUENCY_RESOLUTION: f64 = FFT_FREQUENCY / FFT_SAMPLES as f64;
