//! Core audio types and structures

/// Sample buffer and format types
pub mod audio;

pub use audio::{full_scale, PcmFormat, SampleBuffer};
