use crate::error::{AudioError, AudioResult};
use std::ops::Range;
use std::time::Duration;

/// Full-scale magnitude for integer PCM of the given bit depth.
///
/// Unknown depths fall back to 16-bit semantics.
pub fn full_scale(bit_depth: u16) -> f64 {
    match bit_depth {
        16 => 32768.0,
        24 => 8388608.0,
        32 => 2147483648.0,
        _ => 32768.0,
    }
}

/// Sample format shared by a set of tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Bits per integer sample
    pub bit_depth: u16,
}

/// Decoded integer PCM for one track
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Interleaved samples at their native bit depth
    samples: Vec<i32>,
    /// Sample rate in Hz (e.g., 44100, 48000)
    sample_rate: u32,
    /// Number of channels
    channels: u16,
    /// Bits per sample (16, 24 or 32)
    bit_depth: u16,
    /// Label used in logs and reports, usually the source file name
    name: String,
}

impl SampleBuffer {
    /// Create a new buffer from interleaved samples
    pub fn new(
        samples: Vec<i32>,
        sample_rate: u32,
        channels: u16,
        bit_depth: u16,
    ) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        if channels == 0 {
            return Err(AudioError::BufferError(
                "Channel count must be at least 1".to_string(),
            ));
        }

        if samples.len() % channels as usize != 0 {
            return Err(AudioError::BufferError(
                "Sample count not divisible by channel count".to_string(),
            ));
        }

        Ok(SampleBuffer {
            samples,
            sample_rate,
            channels,
            bit_depth,
            name: String::new(),
        })
    }

    /// Attach a label for logs and reports
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the label of this buffer
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Get mutable reference to the samples
    pub fn samples_mut(&mut self) -> &mut [i32] {
        &mut self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get bits per sample
    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    /// Get the format triple of this buffer
    pub fn format(&self) -> PcmFormat {
        PcmFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
            bit_depth: self.bit_depth,
        }
    }

    /// Get number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Get duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Get duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Remove a sample range, shifting the tail down.
    ///
    /// The range is clamped to the buffer. Both ends must sit on frame
    /// boundaries so channel interleaving survives the splice. Returns the
    /// number of samples removed.
    pub fn remove_samples(&mut self, range: Range<usize>) -> AudioResult<usize> {
        let channels = self.channels as usize;
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);

        if start % channels != 0 || end % channels != 0 {
            return Err(AudioError::BufferError(format!(
                "Range {}..{} is not aligned to {} channels",
                start, end, channels
            )));
        }

        self.samples.drain(start..end);
        Ok(end - start)
    }
}
