#![warn(missing_docs)]

//! # trackcut: Synchronized Multi-Track Silence Cutting
//!
//! Batch tool for sets of synchronized WAV recordings (e.g. one microphone
//! per podcast speaker). Every track is loudness normalized, then spans that
//! are silent in *all* tracks at once are shortened in every track, so the
//! tracks stay frame-aligned with each other.
//!
//! ## Features
//!
//! - **Decode** - 16, 24 and 32-bit integer PCM WAV via Symphonia
//! - **Normalize** - RMS-approximated LUFS with clipping protection
//! - **Detect** - chunked RMS analysis across all tracks in lock-step
//! - **Excise** - in-place region removal that keeps the front of each pause
//! - **Encode** - WAV at the original sample rate, channel count and bit depth
//!
//! ## Quick Start
//!
//! ```ignore
//! use trackcut::processor::{detect, excise_all, DetectionConfig};
//! use trackcut::decoder::load_wav;
//!
//! let mut tracks = vec![load_wav("host.wav")?, load_wav("guest.wav")?];
//! let detection = detect(&tracks, DetectionConfig::new(-50.0, 500, 10)?)?;
//! let results = excise_all(&mut tracks, &detection.regions, 250)?;
//! ```

/// Level measurement and silence classification
pub mod analysis;
/// Run configuration
pub mod config;
/// Core audio types and structures
pub mod core;
/// Audio decoder implementations
pub mod decoder;
/// Audio encoder implementations
pub mod encoder;
/// Error types for audio operations
pub mod error;
/// Whole-track filters (gain, loudness normalization)
pub mod filter;
/// Silence detection, excision and the batch pipeline
pub mod processor;

// Export public types
pub use config::Config;
pub use core::{PcmFormat, SampleBuffer};
pub use error::{AudioError, AudioResult};
pub use processor::{CuttingResult, DetectionConfig, Pipeline, SilenceRegion};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
