use crate::analysis::is_silent;
use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::{debug, info};
use std::fmt;
use std::time::Duration;

/// A span that was silent in every track at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilenceRegion {
    start_frame: usize,
    end_frame: usize,
    sample_rate: u32,
}

impl SilenceRegion {
    /// Create a region over `[start_frame, end_frame)`
    pub fn new(start_frame: usize, end_frame: usize, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        if start_frame >= end_frame {
            return Err(AudioError::ProcessingError(format!(
                "Silence region must not be empty: {}..{}",
                start_frame, end_frame
            )));
        }

        Ok(SilenceRegion {
            start_frame,
            end_frame,
            sample_rate,
        })
    }

    /// First frame of the region
    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    /// Frame just past the region
    pub fn end_frame(&self) -> usize {
        self.end_frame
    }

    /// Number of frames covered
    pub fn frames(&self) -> usize {
        self.end_frame - self.start_frame
    }

    /// Sample rate the frame indices refer to
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start time in seconds
    pub fn start_time(&self) -> f64 {
        self.start_frame as f64 / self.sample_rate as f64
    }

    /// End time in seconds
    pub fn end_time(&self) -> f64 {
        self.end_frame as f64 / self.sample_rate as f64
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Duration of the region
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    /// Whether the region lasts at least `ms` milliseconds
    pub fn lasts_at_least_ms(&self, ms: u32) -> bool {
        self.frames() as u64 * 1000 >= ms as u64 * self.sample_rate as u64
    }
}

impl fmt::Display for SilenceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}s - {:.2}s ({:.2}s duration)",
            self.start_time(),
            self.end_time(),
            self.duration_secs()
        )
    }
}

/// Parameters for common silence detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    threshold_dbfs: f64,
    min_duration_ms: u32,
    chunk_size_ms: u32,
}

impl DetectionConfig {
    /// Create a validated detection config
    ///
    /// # Arguments
    /// * `threshold_dbfs` - Chunks at or below this RMS level are silent, in `[-120, 0]`
    /// * `min_duration_ms` - Shortest region worth reporting
    /// * `chunk_size_ms` - Analysis window length
    pub fn new(threshold_dbfs: f64, min_duration_ms: u32, chunk_size_ms: u32) -> AudioResult<Self> {
        if !(-120.0..=0.0).contains(&threshold_dbfs) {
            return Err(AudioError::ConfigError(format!(
                "Silence threshold must be between -120.0 and 0.0 dBFS, got {}",
                threshold_dbfs
            )));
        }

        if min_duration_ms == 0 {
            return Err(AudioError::ConfigError(
                "Minimum silence duration must be positive".to_string(),
            ));
        }

        if chunk_size_ms == 0 {
            return Err(AudioError::ConfigError(
                "Analysis chunk size must be positive".to_string(),
            ));
        }

        Ok(DetectionConfig {
            threshold_dbfs,
            min_duration_ms,
            chunk_size_ms,
        })
    }

    /// Silence threshold in dBFS
    pub fn threshold_dbfs(&self) -> f64 {
        self.threshold_dbfs
    }

    /// Minimum region duration in milliseconds
    pub fn min_duration_ms(&self) -> u32 {
        self.min_duration_ms
    }

    /// Analysis chunk length in milliseconds
    pub fn chunk_size_ms(&self) -> u32 {
        self.chunk_size_ms
    }

    /// Chunk length in frames at `sample_rate`, never less than one
    pub fn chunk_frames(&self, sample_rate: u32) -> usize {
        let frames = self.chunk_size_ms as u64 * sample_rate as u64 / 1000;
        frames.max(1) as usize
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            threshold_dbfs: -50.0,
            min_duration_ms: 500,
            chunk_size_ms: 10,
        }
    }
}

/// Outcome of a detection pass
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Regions silent in every track, ascending and non-overlapping
    pub regions: Vec<SilenceRegion>,
    /// Sum of region durations in seconds
    pub total_duration: f64,
    /// Frames examined (length of the shortest track)
    pub analyzed_frames: usize,
    /// Duration of the first track in seconds, the base for coverage
    pub audio_duration: f64,
    /// Frames per analysis chunk
    pub chunk_frames: usize,
    /// Number of tracks compared
    pub track_count: usize,
    /// Parameters used
    pub config: DetectionConfig,
}

impl DetectionResult {
    /// Share of the audio covered by common silence, in percent
    pub fn coverage_percent(&self) -> f64 {
        if self.audio_duration <= 0.0 {
            return 0.0;
        }
        self.total_duration / self.audio_duration * 100.0
    }

    /// Whether nothing qualified as common silence
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Silence Detection Results:")?;
        writeln!(f, "  Threshold: {:.1} dBFS", self.config.threshold_dbfs())?;
        writeln!(f, "  Min Duration: {} ms", self.config.min_duration_ms())?;
        writeln!(f, "  Tracks: {}", self.track_count)?;
        writeln!(f, "  Common Silence Regions: {}", self.regions.len())?;

        if self.regions.is_empty() {
            return writeln!(f, "  No common silence regions found with current settings.");
        }

        for (i, region) in self.regions.iter().enumerate() {
            writeln!(f, "  [{}] {}", i + 1, region)?;
        }
        writeln!(
            f,
            "  Total common silence: {:.2}s ({:.1}% of audio)",
            self.total_duration,
            self.coverage_percent()
        )
    }
}

/// Run-length state while walking the chunks
enum RunState {
    /// No candidate open
    NonSilent,
    /// Candidate region open since `start`
    Silent { start: usize },
}

/// Finds spans that are silent across all tracks simultaneously
#[derive(Debug, Clone)]
pub struct CommonSilenceDetector {
    config: DetectionConfig,
}

impl CommonSilenceDetector {
    /// Create a detector
    pub fn new(config: DetectionConfig) -> Self {
        CommonSilenceDetector { config }
    }

    /// Get the detection parameters
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Scan all buffers in lock-step and collect common silence regions.
    ///
    /// All buffers must share sample rate and channel count; that is checked
    /// upstream by [`crate::processor::validate_compatible`]. Analysis stops
    /// at the shortest buffer.
    pub fn detect(&self, buffers: &[SampleBuffer]) -> AudioResult<DetectionResult> {
        let reference = buffers
            .first()
            .ok_or_else(|| AudioError::ConfigError("No audio tracks provided".to_string()))?;

        let sample_rate = reference.sample_rate();
        let chunk_frames = self.config.chunk_frames(sample_rate);
        let analyzed_frames = buffers
            .iter()
            .map(SampleBuffer::frame_count)
            .min()
            .unwrap_or(0);

        info!(
            "Analyzing {} frames across {} tracks in chunks of {} frames ({} ms)",
            analyzed_frames,
            buffers.len(),
            chunk_frames,
            self.config.chunk_size_ms()
        );

        let mut regions = Vec::new();
        let mut state = RunState::NonSilent;

        for frame_start in (0..analyzed_frames).step_by(chunk_frames) {
            let frame_end = (frame_start + chunk_frames).min(analyzed_frames);

            let common = buffers.iter().all(|buffer| {
                is_silent(buffer, frame_start, frame_end, self.config.threshold_dbfs())
            });

            state = match (state, common) {
                (RunState::NonSilent, true) => RunState::Silent { start: frame_start },
                (RunState::Silent { start }, false) => {
                    self.close_region(start, frame_start, sample_rate, &mut regions)?;
                    RunState::NonSilent
                }
                (state, _) => state,
            };
        }

        // Silence running into the end of the analyzed span
        if let RunState::Silent { start } = state {
            self.close_region(start, analyzed_frames, sample_rate, &mut regions)?;
        }

        let total_duration: f64 = regions.iter().map(SilenceRegion::duration_secs).sum();

        info!(
            "Found {} common silence regions ({:.2}s total)",
            regions.len(),
            total_duration
        );

        Ok(DetectionResult {
            regions,
            total_duration,
            analyzed_frames,
            audio_duration: reference.duration_secs(),
            chunk_frames,
            track_count: buffers.len(),
            config: self.config,
        })
    }

    /// Emit `[start, end)` if it passes the minimum duration gate
    fn close_region(
        &self,
        start: usize,
        end: usize,
        sample_rate: u32,
        regions: &mut Vec<SilenceRegion>,
    ) -> AudioResult<()> {
        let region = SilenceRegion::new(start, end, sample_rate)?;

        if region.lasts_at_least_ms(self.config.min_duration_ms()) {
            debug!("Common silence {}", region);
            regions.push(region);
        } else {
            debug!(
                "Discarding silence {}..{} shorter than {} ms",
                start,
                end,
                self.config.min_duration_ms()
            );
        }

        Ok(())
    }
}

/// Detect common silence with a one-off detector
pub fn detect(buffers: &[SampleBuffer], config: DetectionConfig) -> AudioResult<DetectionResult> {
    CommonSilenceDetector::new(config).detect(buffers)
}
