use super::detect::{CommonSilenceDetector, DetectionResult};
use super::excise::{excise_all, CuttingResult};
use super::validate::validate_compatible;
use crate::analysis::ContentReport;
use crate::config::Config;
use crate::core::SampleBuffer;
use crate::decoder::load_wav;
use crate::encoder::save_wav;
use crate::error::AudioResult;
use crate::filter::{Filter, NormalizationResult, Normalize};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run produced, for reporting
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Per-track statistics, filled when `debug_info` is set
    pub content: Vec<ContentReport>,
    /// Per-track normalization, empty in test-copy mode
    pub normalization: Vec<NormalizationResult>,
    /// Common silence, `None` in test-copy mode
    pub detection: Option<DetectionResult>,
    /// Per-track cutting, empty when nothing was cut
    pub cutting: Vec<CuttingResult>,
    /// Written files with their final durations in seconds
    pub outputs: Vec<(PathBuf, f64)>,
}

/// Loads, normalizes, trims and writes a set of synchronized tracks
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline for `config`
    pub fn new(config: Config) -> Self {
        Pipeline { config }
    }

    /// Get the run configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole batch.
    ///
    /// Nothing is written until every track has been processed, and outputs
    /// already written are removed again if a later one fails, so a failure
    /// at any stage leaves no partial outputs behind.
    pub fn run(&self) -> AudioResult<PipelineReport> {
        self.config.validate()?;

        let mut buffers = self
            .config
            .input_files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                info!(
                    "[{}/{}] Loading {}",
                    i + 1,
                    self.config.input_files.len(),
                    path.display()
                );
                load_wav(path)
            })
            .collect::<AudioResult<Vec<_>>>()?;

        let mut report = self.process(&mut buffers)?;
        report.outputs = self.write_outputs(&buffers)?;

        info!("Generated {} output file(s)", report.outputs.len());
        Ok(report)
    }

    /// Run every in-memory stage over already loaded tracks
    pub fn process(&self, buffers: &mut [SampleBuffer]) -> AudioResult<PipelineReport> {
        let format = validate_compatible(buffers)?;
        info!(
            "{} compatible tracks ({} Hz, {} ch)",
            buffers.len(),
            format.sample_rate,
            format.channels
        );

        let mut report = PipelineReport::default();

        if self.config.debug_info {
            report.content = buffers.iter().map(ContentReport::analyze).collect();
        }

        if self.config.test_copy {
            info!("Test copy mode: skipping processing");
            return Ok(report);
        }

        let mut normalizer = Normalize::new(self.config.target_loudness)?;
        report.normalization = buffers
            .iter_mut()
            .map(|buffer| normalizer.process(buffer))
            .collect::<AudioResult<Vec<_>>>()?;

        let detector = CommonSilenceDetector::new(self.config.detection_config()?);
        let detection = detector.detect(buffers)?;

        if !detection.is_empty() {
            report.cutting = excise_all(
                buffers,
                &detection.regions,
                self.config.keep_silence_ms,
            )?;
        } else {
            info!("No silence regions to cut");
        }

        report.detection = Some(detection);
        Ok(report)
    }

    /// Write every buffer next to its input, all or nothing
    fn write_outputs(&self, buffers: &[SampleBuffer]) -> AudioResult<Vec<(PathBuf, f64)>> {
        let mut written: Vec<(PathBuf, f64)> = Vec::with_capacity(buffers.len());

        for (path, buffer) in self.config.output_files().into_iter().zip(buffers) {
            info!("Saving {}", path.display());
            let existed = path.exists();

            if let Err(e) = save_wav(buffer, &path) {
                warn!("Failed to write {}: {}", path.display(), e);

                // A file this run created is at best half written
                if !existed && path.is_file() {
                    remove_output(&path);
                }
                for (done, _) in &written {
                    remove_output(done);
                }
                return Err(e);
            }

            written.push((path, buffer.duration_secs()));
        }

        Ok(written)
    }
}

fn remove_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}
