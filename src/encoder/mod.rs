//! Audio encoder implementations

/// WAV file encoder
pub mod wav;

pub use wav::{save_wav, WavEncoder};

use crate::core::SampleBuffer;
use crate::error::AudioResult;

/// Trait for audio encoders
pub trait Encoder {
    /// Encode a whole buffer to output
    fn encode(&mut self, buffer: &SampleBuffer) -> AudioResult<()>;

    /// Finalize encoding (flush any remaining data)
    fn finalize(&mut self) -> AudioResult<()> {
        Ok(())
    }
}
