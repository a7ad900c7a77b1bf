//! Audio decoder implementations

/// Integer PCM decoding through Symphonia
pub mod pcm;

pub use pcm::SymphoniaDecoder;

use crate::core::{PcmFormat, SampleBuffer};
use crate::error::AudioResult;
use log::debug;
use std::path::Path;

/// Trait for integer PCM decoders
pub trait Decoder: Send {
    /// Format of the samples this decoder produces
    fn format(&self) -> PcmFormat;

    /// Get the next block of interleaved samples
    fn decode_block(&mut self) -> AudioResult<Option<Vec<i32>>>;

    /// Check if decoder is finished
    fn is_finished(&self) -> bool;

    /// Decode the remaining stream into a single buffer
    fn decode_all(&mut self) -> AudioResult<SampleBuffer> {
        let format = self.format();
        let mut samples = Vec::new();

        while let Some(block) = self.decode_block()? {
            samples.extend_from_slice(&block);
        }

        SampleBuffer::new(samples, format.sample_rate, format.channels, format.bit_depth)
    }
}

/// Create a decoder from a file path
pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Box<dyn Decoder>> {
    let path = path.as_ref();
    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}

/// Load a whole WAV file, labelled with its file name
pub fn load_wav<P: AsRef<Path>>(path: P) -> AudioResult<SampleBuffer> {
    let path = path.as_ref();
    let mut decoder = from_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let buffer = decoder.decode_all()?.with_name(name);

    debug!(
        "Loaded {} ({:.2}s, {} Hz, {} ch, {} bit)",
        buffer.name(),
        buffer.duration_secs(),
        buffer.sample_rate(),
        buffer.channels(),
        buffer.bit_depth()
    );

    Ok(buffer)
}
