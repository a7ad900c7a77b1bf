use super::detect::SilenceRegion;
use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::{debug, info};
use std::fmt;

/// Per-track summary of an excision pass
#[derive(Debug, Clone)]
pub struct CuttingResult {
    /// Track label
    pub name: String,
    /// Duration before cutting, in seconds
    pub original_duration: f64,
    /// Duration after cutting, in seconds
    pub new_duration: f64,
    /// Sum of the spans actually removed, in seconds
    pub removed_duration: f64,
    /// Frames actually removed
    pub frames_removed: usize,
    /// Regions that lost samples, ascending
    pub regions_cut: Vec<SilenceRegion>,
    /// Silence kept at the front of each cut region, in milliseconds
    pub keep_duration_ms: u32,
}

impl CuttingResult {
    /// Removed share of the original duration, in percent
    pub fn removed_percent(&self) -> f64 {
        if self.original_duration <= 0.0 {
            return 0.0;
        }
        self.removed_duration / self.original_duration * 100.0
    }
}

impl fmt::Display for CuttingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2}s -> {:.2}s ({:.2}s removed, {:.1}%, {} regions)",
            self.name,
            self.original_duration,
            self.new_duration,
            self.removed_duration,
            self.removed_percent(),
            self.regions_cut.len()
        )
    }
}

/// Shortens silence regions in place, keeping the front of each region
#[derive(Debug, Clone, Copy)]
pub struct RegionExcisor {
    keep_duration_ms: u32,
}

impl RegionExcisor {
    /// Create an excisor that keeps `keep_duration_ms` of every cut region
    pub fn new(keep_duration_ms: u32) -> Self {
        RegionExcisor { keep_duration_ms }
    }

    /// Silence kept per region, in milliseconds
    pub fn keep_duration_ms(&self) -> u32 {
        self.keep_duration_ms
    }

    /// Remove the tail of every region longer than the keep duration.
    ///
    /// `regions` must be ascending by start frame and non-overlapping, as
    /// produced by detection. Regions are walked from last to first so the
    /// frame indices of earlier regions stay valid while the buffer shrinks.
    pub fn excise(
        &self,
        buffer: &mut SampleBuffer,
        regions: &[SilenceRegion],
    ) -> AudioResult<CuttingResult> {
        let channels = buffer.channels() as usize;
        let sample_rate = buffer.sample_rate() as u64;
        let original_duration = buffer.duration_secs();
        let keep_frames = (self.keep_duration_ms as u64 * sample_rate / 1000) as usize;

        let mut regions_cut = Vec::new();
        let mut frames_removed = 0;

        for region in regions.iter().rev() {
            if region.sample_rate() != buffer.sample_rate() {
                return Err(AudioError::InvalidSampleRate {
                    rate: region.sample_rate(),
                });
            }

            // Short regions stay as they are
            if !self.exceeds_keep(region) {
                continue;
            }

            let len = buffer.samples().len();
            let end_sample = (region.end_frame() * channels).min(len);
            let start_sample = (region.start_frame() * channels).min(end_sample);
            let keep_samples = keep_frames * channels;

            if keep_samples >= end_sample - start_sample {
                // Region got clipped by the buffer end and nothing is left to cut
                continue;
            }

            let cut_start = start_sample + keep_samples;
            let removed = buffer.remove_samples(cut_start..end_sample)?;
            let removed_frames = removed / channels;

            debug!(
                "{}: cut {} frames from {} (kept {} frames)",
                buffer.name(),
                removed_frames,
                region,
                keep_frames
            );

            frames_removed += removed_frames;
            regions_cut.push(*region);
        }

        regions_cut.reverse();

        let new_duration = buffer.duration_secs();
        let removed_duration = frames_removed as f64 / sample_rate as f64;

        info!(
            "{}: {:.2}s -> {:.2}s ({} regions cut)",
            buffer.name(),
            original_duration,
            new_duration,
            regions_cut.len()
        );

        Ok(CuttingResult {
            name: buffer.name().to_string(),
            original_duration,
            new_duration,
            removed_duration,
            frames_removed,
            regions_cut,
            keep_duration_ms: self.keep_duration_ms,
        })
    }

    /// Whether `region` is strictly longer than the keep duration
    fn exceeds_keep(&self, region: &SilenceRegion) -> bool {
        region.frames() as u64 * 1000 > self.keep_duration_ms as u64 * region.sample_rate() as u64
    }
}

/// Excise the same regions from a single buffer
pub fn excise(
    buffer: &mut SampleBuffer,
    regions: &[SilenceRegion],
    keep_duration_ms: u32,
) -> AudioResult<CuttingResult> {
    RegionExcisor::new(keep_duration_ms).excise(buffer, regions)
}

/// Excise the same regions from every buffer, in input order
pub fn excise_all(
    buffers: &mut [SampleBuffer],
    regions: &[SilenceRegion],
    keep_duration_ms: u32,
) -> AudioResult<Vec<CuttingResult>> {
    if buffers.is_empty() {
        return Err(AudioError::ConfigError(
            "No audio tracks provided".to_string(),
        ));
    }

    let excisor = RegionExcisor::new(keep_duration_ms);
    buffers
        .iter_mut()
        .map(|buffer| excisor.excise(buffer, regions))
        .collect()
}
