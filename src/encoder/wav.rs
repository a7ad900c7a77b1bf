use crate::core::{PcmFormat, SampleBuffer};
use crate::error::{AudioError, AudioResult};
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// Integer PCM WAV encoder
pub struct WavEncoder {
    writer: Option<WavWriter<std::io::BufWriter<std::fs::File>>>,
    format: PcmFormat,
}

impl WavEncoder {
    /// Create a new WAV encoder to file
    pub fn new<P: AsRef<Path>>(path: P, format: PcmFormat) -> AudioResult<Self> {
        if !matches!(format.bit_depth, 16 | 24 | 32) {
            return Err(AudioError::UnsupportedFormat(format!(
                "Cannot write {}-bit samples",
                format.bit_depth
            )));
        }

        if format.sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: 0 });
        }

        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.bit_depth,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = WavWriter::create(path, spec)?;

        Ok(WavEncoder {
            writer: Some(writer),
            format,
        })
    }

    /// Get the output format
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u32 {
        self.writer.as_ref().map(|w| w.len()).unwrap_or(0)
    }
}

impl super::Encoder for WavEncoder {
    fn encode(&mut self, buffer: &SampleBuffer) -> AudioResult<()> {
        if buffer.sample_rate() != self.format.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: buffer.sample_rate(),
            });
        }

        if buffer.channels() != self.format.channels {
            return Err(AudioError::FormatMismatch {
                what: "channel count",
                reference: "encoder".to_string(),
                reference_value: self.format.channels as u32,
                file: buffer.name().to_string(),
                value: buffer.channels() as u32,
            });
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::ProcessingError("Encoder already finalized".to_string()))?;

        for &sample in buffer.samples() {
            writer.write_sample(sample)?;
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

/// Write a buffer to `path` at its own sample rate, channel count and bit depth
pub fn save_wav<P: AsRef<Path>>(buffer: &SampleBuffer, path: P) -> AudioResult<()> {
    use super::Encoder;

    let mut encoder = WavEncoder::new(path, buffer.format())?;
    encoder.encode(buffer)?;
    encoder.finalize()
}
