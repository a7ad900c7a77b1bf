use super::energy::{buffer_rms, to_dbfs};
use crate::core::SampleBuffer;
use std::fmt;

/// Rough classification of how much of a track is digital silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceClass {
    /// More than 95% zero samples
    MostlySilent,
    /// More than 80% zero samples
    Quiet,
    /// Everything else
    Audible,
}

impl SilenceClass {
    fn from_percent(silence_percent: f64) -> Self {
        if silence_percent > 95.0 {
            SilenceClass::MostlySilent
        } else if silence_percent > 80.0 {
            SilenceClass::Quiet
        } else {
            SilenceClass::Audible
        }
    }
}

/// Sample statistics of one track, shown with `--debug-info`
#[derive(Debug, Clone)]
pub struct ContentReport {
    /// Track label
    pub name: String,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Bits per sample
    pub bit_depth: u16,
    /// Total interleaved samples
    pub total_samples: usize,
    /// Frames (samples per channel)
    pub frames: usize,
    /// Smallest sample value, `None` for an empty track
    pub min_sample: Option<i32>,
    /// Largest sample value, `None` for an empty track
    pub max_sample: Option<i32>,
    /// Number of samples equal to zero
    pub zero_samples: usize,
    /// Whole-track RMS level in dBFS
    pub rms_dbfs: f64,
    /// Share of non-zero samples in the first second, in percent
    pub first_second_audio: Option<f64>,
    /// Share of non-zero samples in the last second, in percent
    pub last_second_audio: Option<f64>,
}

impl ContentReport {
    /// Collect statistics for a buffer
    pub fn analyze(buffer: &SampleBuffer) -> Self {
        let samples = buffer.samples();
        let zero_samples = samples.iter().filter(|&&s| s == 0).count();

        // One second worth of interleaved samples
        let second = buffer.sample_rate() as usize * buffer.channels() as usize;
        let audio_percent = |window: &[i32]| {
            let non_zero = window.iter().filter(|&&s| s != 0).count();
            non_zero as f64 / second as f64 * 100.0
        };

        let (first_second_audio, last_second_audio) = if samples.len() >= second {
            (
                Some(audio_percent(&samples[..second])),
                Some(audio_percent(&samples[samples.len() - second..])),
            )
        } else {
            (None, None)
        };

        ContentReport {
            name: buffer.name().to_string(),
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channels(),
            bit_depth: buffer.bit_depth(),
            total_samples: samples.len(),
            frames: buffer.frame_count(),
            min_sample: samples.iter().copied().min(),
            max_sample: samples.iter().copied().max(),
            zero_samples,
            rms_dbfs: to_dbfs(buffer_rms(buffer)),
            first_second_audio,
            last_second_audio,
        }
    }

    /// Number of non-zero samples
    pub fn non_zero_samples(&self) -> usize {
        self.total_samples - self.zero_samples
    }

    /// Percentage of samples that are exactly zero
    pub fn silence_percent(&self) -> f64 {
        if self.total_samples == 0 {
            return 100.0;
        }
        self.zero_samples as f64 / self.total_samples as f64 * 100.0
    }

    /// Classification derived from [`ContentReport::silence_percent`]
    pub fn silence_class(&self) -> SilenceClass {
        SilenceClass::from_percent(self.silence_percent())
    }
}

impl fmt::Display for ContentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Audio Content Analysis: {} ===", self.name)?;
        writeln!(f, "  Duration: {:.2} seconds", self.duration_secs)?;
        writeln!(f, "  Sample Rate: {} Hz", self.sample_rate)?;
        writeln!(f, "  Channels: {}", self.channels)?;
        writeln!(f, "  Bit Depth: {} bits", self.bit_depth)?;
        writeln!(f, "  Total Samples: {}", self.total_samples)?;
        writeln!(f, "  Frames: {}", self.frames)?;

        let (Some(min), Some(max)) = (self.min_sample, self.max_sample) else {
            return writeln!(f, "  No audio samples found");
        };

        let total = self.total_samples as f64;
        writeln!(f, "  Min Sample: {}", min)?;
        writeln!(f, "  Max Sample: {}", max)?;
        writeln!(
            f,
            "  Zero Samples: {} ({:.1}%)",
            self.zero_samples,
            self.zero_samples as f64 / total * 100.0
        )?;
        writeln!(
            f,
            "  Non-Zero Samples: {} ({:.1}%)",
            self.non_zero_samples(),
            self.non_zero_samples() as f64 / total * 100.0
        )?;
        writeln!(f, "  RMS Level: {:.1} dBFS", self.rms_dbfs)?;

        let silence = self.silence_percent();
        match self.silence_class() {
            SilenceClass::MostlySilent => writeln!(
                f,
                "  WARNING: track is {:.1}% silent, may be empty or a very quiet recording",
                silence
            )?,
            SilenceClass::Quiet => {
                writeln!(f, "  Track has {:.1}% silence, possibly a quiet recording", silence)?
            }
            SilenceClass::Audible => {
                writeln!(f, "  Track contains {:.1}% audio content", 100.0 - silence)?
            }
        }

        if let (Some(first), Some(last)) = (self.first_second_audio, self.last_second_audio) {
            writeln!(f, "  First second: {:.1}% audio", first)?;
            writeln!(f, "  Last second: {:.1}% audio", last)?;
        }

        Ok(())
    }
}
