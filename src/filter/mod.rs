//! In-place filters applied to whole tracks

/// Linear gain with saturation
pub mod gain;
/// Loudness normalization
pub mod normalize;

pub use gain::{Gain, GainReport};
pub use normalize::{
    calculate_gain, measure_loudness, normalize, validate_target_loudness, LoudnessMeasurement,
    NormalizationResult, Normalize,
};

use crate::core::SampleBuffer;
use crate::error::AudioResult;

/// Trait for audio filters
pub trait Filter {
    /// Summary produced for each processed buffer
    type Report;

    /// Process a buffer in place
    fn process(&mut self, buffer: &mut SampleBuffer) -> AudioResult<Self::Report>;
}
